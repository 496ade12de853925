use arrow::array::{ArrayRef, BooleanArray, ListBuilder, StringArray, StringBuilder, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use extract::Tag;
use ingest::Row;
use std::sync::Arc;

/// Column layout shared by every level; attributes a level does not
/// produce are null.
pub fn dataset_schema() -> SchemaRef {
    let mut fields = vec![
        Field::new("doc_id", DataType::Utf8, false),
        Field::new("row_id", DataType::Utf8, false),
        Field::new("level", DataType::Utf8, false),
        Field::new("position", DataType::UInt32, true),
        Field::new("tag", DataType::Utf8, true),
        Field::new_list("tags", Field::new("item", DataType::Utf8, true), true),
        Field::new("segment_count", DataType::UInt32, false),
        Field::new("text", DataType::Utf8, false),
    ];
    // One text column per tag, in tag order
    fields.extend(Tag::ALL.iter().map(|tag| Field::new(tag.as_str(), DataType::Utf8, true)));
    fields.push(Field::new("outcome", DataType::Utf8, false));
    fields.push(Field::new("label", DataType::Boolean, false));

    Arc::new(Schema::new(fields))
}

pub fn rows_to_batch(schema: SchemaRef, rows: &[Row]) -> Result<RecordBatch, ArrowError> {
    let mut tags = ListBuilder::new(StringBuilder::new());
    for row in rows {
        match &row.tags {
            Some(row_tags) => {
                for tag in row_tags {
                    tags.values().append_value(tag.as_str());
                }
                tags.append(true);
            }
            None => tags.append(false),
        }
    }

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.doc_id.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.row_id.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.level.as_str()))),
        Arc::new(rows.iter().map(|r| r.position).collect::<UInt32Array>()),
        Arc::new(rows.iter().map(|r| r.tag.map(|t| t.as_str())).collect::<StringArray>()),
        Arc::new(tags.finish()),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.segment_count))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.text.as_str()))),
    ];
    for tag in Tag::ALL {
        columns.push(Arc::new(rows.iter().map(|r| r.tag_text(tag)).collect::<StringArray>()));
    }
    columns.push(Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.outcome.as_str()))));
    columns.push(Arc::new(BooleanArray::from(rows.iter().map(|r| r.label).collect::<Vec<_>>())));

    RecordBatch::try_new(schema, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ListArray};
    use extract::Outcome;
    use ingest::{Level, RowContent};
    use std::collections::BTreeMap;

    #[test]
    fn test_batch_matches_schema() {
        let rows = vec![
            Row::new(
                "doc".to_string(),
                Level::Document,
                Outcome::Upheld,
                RowContent {
                    position: None,
                    tag: None,
                    tags: None,
                    segment_count: 2,
                    text: "r\nd".to_string(),
                    tag_texts: BTreeMap::from([
                        (Tag::Req, "r".to_string()),
                        (Tag::Dec, "d".to_string()),
                    ]),
                },
            ),
            Row::new(
                "doc".to_string(),
                Level::Segment,
                Outcome::Upheld,
                RowContent {
                    position: Some(1),
                    tag: Some(Tag::Dec),
                    tags: Some(vec![Tag::Dec]),
                    segment_count: 1,
                    text: "d".to_string(),
                    tag_texts: BTreeMap::from([(Tag::Dec, "d".to_string())]),
                },
            ),
        ];

        let batch = rows_to_batch(dataset_schema(), &rows).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 16);

        let req = batch.column_by_name("req").unwrap();
        assert!(req.is_valid(0));
        assert!(req.is_null(1));

        let tags = batch
            .column_by_name("tags")
            .unwrap()
            .as_any()
            .downcast_ref::<ListArray>()
            .unwrap();
        assert!(tags.is_null(0));
        assert_eq!(tags.value_length(1), 1);
    }

    #[test]
    fn test_empty_batch() {
        let batch = rows_to_batch(dataset_schema(), &[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
