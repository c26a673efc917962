mod adapter;
mod memory_fs;

use crate::TreePath;

pub(crate) fn p(key: &str) -> TreePath {
    TreePath::parse(key).unwrap()
}
