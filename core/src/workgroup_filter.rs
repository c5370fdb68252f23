//! Narrowing record and shift collections to one workgroup.

use crate::{aggregator::ShiftGroup, record::RawAssignment};

/// Anything that belongs to a workgroup.
pub trait HasWorkgroup {
    fn workgroup_id(&self) -> Option<&str>;
}

impl HasWorkgroup for RawAssignment {
    fn workgroup_id(&self) -> Option<&str> {
        self.workgroup_id.as_deref()
    }
}

impl HasWorkgroup for ShiftGroup {
    fn workgroup_id(&self) -> Option<&str> {
        self.workgroup_id.as_deref()
    }
}

/// Items belonging to `workgroup_id`, in their original order.
///
/// `None` or an empty id means no filtering: every item is returned.
/// The result borrows from `items`, which is never modified.
pub fn filter_by_workgroup<'a, T: HasWorkgroup>(
    items: &'a [T],
    workgroup_id: Option<&str>,
) -> Vec<&'a T> {
    match workgroup_id.filter(|id| !id.is_empty()) {
        None => items.iter().collect(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.workgroup_id() == Some(wanted))
            .collect(),
    }
}

/// Owned variant of [`filter_by_workgroup`] for data the caller hands over.
pub fn retain_workgroup<T: HasWorkgroup>(mut items: Vec<T>, workgroup_id: Option<&str>) -> Vec<T> {
    if let Some(wanted) = workgroup_id.filter(|id| !id.is_empty()) {
        items.retain(|item| item.workgroup_id() == Some(wanted));
    }
    items
}
