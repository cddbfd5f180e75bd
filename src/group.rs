use indexmap::IndexMap;

use crate::table::Row;

/// Partition rows by workgroup id.
///
/// Iteration order is the workgroup's first appearance in the source file.
/// Each group is sorted by `(start_time_student_clock,
/// end_time_student_clock)` ascending; the sort is stable, so rows with
/// equal clocks keep their original file order.
pub fn group_by_workgroup(rows: &[Row]) -> IndexMap<String, Vec<Row>> {
    let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
    for row in rows {
        groups
            .entry(row.workgroup_id.to_string())
            .or_default()
            .push(row.clone());
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            a.start_time_student_clock
                .cmp_scalar(&b.start_time_student_clock)
                .then_with(|| {
                    a.end_time_student_clock
                        .cmp_scalar(&b.end_time_student_clock)
                })
        });
    }
    groups
}
