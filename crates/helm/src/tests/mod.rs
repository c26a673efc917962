mod orchestration;
