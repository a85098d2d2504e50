//! Field comparator
//!
//! Per-axis comparison of a matched column pair. The four monitored axes
//! are compared independently and in the fixed order of
//! [`FieldAxis::ORDER`]; an axis that is unset on either side is skipped,
//! since a legacy or partially populated record must not raise a false diff.

use mica_connector::ColumnRecord;

use crate::types::{FieldAxis, FieldDiff};

/// Compare the monitored fields of a matched column pair.
///
/// `old_value` in each diff is the tracked side, `new_value` the source
/// side. Returns at most one entry per axis; an empty vector means the pair
/// needs no modified record.
#[must_use]
pub fn compare_columns(source: &ColumnRecord, tracked: &ColumnRecord) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    if let (Some(tracked_value), Some(source_value)) = (&tracked.data_type, &source.data_type) {
        if tracked_value != source_value {
            diffs.push(FieldDiff::new(
                FieldAxis::DataType,
                tracked_value,
                source_value,
            ));
        }
    }

    if let (Some(tracked_value), Some(source_value)) = (tracked.nullable, source.nullable) {
        if tracked_value != source_value {
            diffs.push(FieldDiff::new(
                FieldAxis::Nullability,
                tracked_value.to_string(),
                source_value.to_string(),
            ));
        }
    }

    if let (Some(tracked_value), Some(source_value)) = (tracked.primary_key, source.primary_key) {
        if tracked_value != source_value {
            diffs.push(FieldDiff::new(
                FieldAxis::PrimaryKey,
                tracked_value.to_string(),
                source_value.to_string(),
            ));
        }
    }

    if let (Some(tracked_value), Some(source_value)) =
        (tracked.ordinal_position, source.ordinal_position)
    {
        if tracked_value != source_value {
            diffs.push(FieldDiff::new(
                FieldAxis::OrdinalPosition,
                tracked_value.to_string(),
                source_value.to_string(),
            ));
        }
    }

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::ColumnKey;

    fn column(name: &str) -> ColumnRecord {
        ColumnRecord::new(ColumnKey::new("dbo", "Accounts", name).unwrap())
    }

    #[test]
    fn test_identical_columns_yield_no_diffs() {
        let record = column("name")
            .with_data_type("varchar(50)")
            .with_nullable(true)
            .with_primary_key(false)
            .with_ordinal_position(2);

        assert!(compare_columns(&record, &record.clone()).is_empty());
    }

    #[test]
    fn test_data_type_diff_orients_tracked_to_source() {
        let tracked = column("name").with_data_type("varchar(50)");
        let source = column("name").with_data_type("varchar(100)");

        let diffs = compare_columns(&source, &tracked);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, FieldAxis::DataType);
        assert_eq!(diffs[0].old_value, "varchar(50)");
        assert_eq!(diffs[0].new_value, "varchar(100)");
    }

    #[test]
    fn test_nullability_diff() {
        let tracked = column("name").with_nullable(true);
        let source = column("name").with_nullable(false);

        let diffs = compare_columns(&source, &tracked);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, FieldAxis::Nullability);
        assert_eq!(diffs[0].old_value, "true");
        assert_eq!(diffs[0].new_value, "false");
    }

    #[test]
    fn test_absent_side_skips_the_axis() {
        // Tracked side has no nullability recorded, so only the data type
        // may contribute a diff.
        let tracked = column("name").with_data_type("int");
        let source = column("name")
            .with_data_type("bigint")
            .with_nullable(false)
            .with_primary_key(true)
            .with_ordinal_position(1);

        let diffs = compare_columns(&source, &tracked);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, FieldAxis::DataType);
    }

    #[test]
    fn test_both_sides_absent_skips_the_axis() {
        let tracked = column("name");
        let source = column("name");

        assert!(compare_columns(&source, &tracked).is_empty());
    }

    #[test]
    fn test_multiple_diffs_follow_axis_order() {
        let tracked = column("account_id")
            .with_data_type("int")
            .with_nullable(true)
            .with_primary_key(false)
            .with_ordinal_position(2);
        let source = column("account_id")
            .with_data_type("bigint")
            .with_nullable(false)
            .with_primary_key(true)
            .with_ordinal_position(1);

        let diffs = compare_columns(&source, &tracked);
        let axes: Vec<FieldAxis> = diffs.iter().map(|d| d.field).collect();
        assert_eq!(axes, FieldAxis::ORDER);
    }

    #[test]
    fn test_at_most_one_entry_per_axis() {
        let tracked = column("account_id")
            .with_data_type("int")
            .with_primary_key(false);
        let source = column("account_id")
            .with_data_type("bigint")
            .with_primary_key(true);

        let diffs = compare_columns(&source, &tracked);
        assert_eq!(diffs.len(), 2);
        for axis in FieldAxis::ORDER {
            assert!(diffs.iter().filter(|d| d.field == axis).count() <= 1);
        }
    }

    #[test]
    fn test_primary_key_and_ordinal_change() {
        let tracked = column("account_id")
            .with_data_type("int")
            .with_primary_key(false)
            .with_ordinal_position(2);
        let source = column("account_id")
            .with_data_type("int")
            .with_primary_key(true)
            .with_ordinal_position(1);

        let diffs = compare_columns(&source, &tracked);
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].field, FieldAxis::PrimaryKey);
        assert_eq!(diffs[0].old_value, "false");
        assert_eq!(diffs[0].new_value, "true");
        assert_eq!(diffs[1].field, FieldAxis::OrdinalPosition);
        assert_eq!(diffs[1].old_value, "2");
        assert_eq!(diffs[1].new_value, "1");
    }
}
