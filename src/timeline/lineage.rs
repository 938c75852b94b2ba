use crate::models::{ExecutionRecord, ExecutionType};
use std::collections::HashMap;

/// How a record's `parent_execution_id` resolves against the record set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLink<'a> {
    Root,
    Found(&'a ExecutionRecord),
    Missing(i64),
}

/// Id-keyed view over a record slice for resolving replay/shadow lineage.
pub struct ExecutionIndex<'a> {
    records: &'a [ExecutionRecord],
    by_id: HashMap<i64, usize>,
}

impl<'a> ExecutionIndex<'a> {
    pub fn new(records: &'a [ExecutionRecord]) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id, pos))
            .collect();
        Self { records, by_id }
    }

    pub fn get(&self, id: i64) -> Option<&'a ExecutionRecord> {
        let records = self.records;
        self.by_id.get(&id).map(|&pos| &records[pos])
    }

    pub fn parent_of(&self, record: &ExecutionRecord) -> ParentLink<'a> {
        match record.parent_execution_id {
            None => ParentLink::Root,
            Some(id) => self
                .get(id)
                .map_or(ParentLink::Missing(id), ParentLink::Found),
        }
    }

    pub fn children_of(&self, id: i64) -> Vec<&'a ExecutionRecord> {
        self.records
            .iter()
            .filter(|record| record.parent_execution_id == Some(id))
            .collect()
    }

    /// Most recent child of `id` with the given type.
    pub fn derived_of(&self, id: i64, execution_type: ExecutionType) -> Option<&'a ExecutionRecord> {
        self.children_of(id)
            .into_iter()
            .filter(|record| record.execution_type == execution_type)
            .max_by_key(|record| (record.timestamp, record.lamport))
    }

    /// Records whose parent id does not resolve.
    pub fn dangling(&self) -> Vec<&'a ExecutionRecord> {
        self.records
            .iter()
            .filter(|record| matches!(self.parent_of(record), ParentLink::Missing(_)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus::{Failed, Success};
    use crate::models::ExecutionType::{Replay, Shadow};
    use crate::timeline::fixtures::{normal, record};

    fn sample() -> Vec<ExecutionRecord> {
        vec![
            normal(1003, "sendNotification", Failed, 12 * 60),
            record(1013, "sendNotification", Success, Replay, Some(1003), 10 * 60),
            record(1014, "sendNotification", Failed, Replay, Some(1003), 11 * 60),
            record(1023, "sendNotification", Success, Shadow, Some(1003), 9 * 60),
            record(2000, "resizeImage", Success, Replay, Some(999), 60),
        ]
    }

    #[test]
    fn resolves_parents_by_id() {
        let records = sample();
        let index = ExecutionIndex::new(&records);

        assert_eq!(index.parent_of(&records[0]), ParentLink::Root);
        match index.parent_of(&records[1]) {
            ParentLink::Found(parent) => assert_eq!(parent.id, 1003),
            other => panic!("unexpected link {:?}", other),
        }
        assert_eq!(index.parent_of(&records[4]), ParentLink::Missing(999));
        assert!(index.get(42).is_none());
    }

    #[test]
    fn lists_children_and_latest_derived_run() {
        let records = sample();
        let index = ExecutionIndex::new(&records);

        let children: Vec<i64> = index.children_of(1003).iter().map(|r| r.id).collect();
        assert_eq!(children, vec![1013, 1014, 1023]);
        assert_eq!(index.derived_of(1003, Replay).map(|r| r.id), Some(1013));
        assert_eq!(index.derived_of(1003, Shadow).map(|r| r.id), Some(1023));
        assert!(index.derived_of(1013, Replay).is_none());
    }

    #[test]
    fn reports_dangling_references_without_failing() {
        let records = sample();
        let index = ExecutionIndex::new(&records);
        let dangling: Vec<i64> = index.dangling().iter().map(|r| r.id).collect();
        assert_eq!(dangling, vec![2000]);
    }
}
