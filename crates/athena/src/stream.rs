//! Paging result stream over `GetQueryResults`.

use std::collections::VecDeque;

use async_trait::async_trait;
use aws_sdk_athena::operation::get_query_results::GetQueryResultsOutput;
use aws_sdk_athena::types::StatementType;
use quarry_core::{Column, ResultStream, Row};
use tracing::debug;

use crate::client::{sdk_err, AthenaError};
use crate::convert::parse_value;

/// Maximum page size `GetQueryResults` accepts.
const PAGE_SIZE: i32 = 1000;

/// Result stream of a finished Athena query.
///
/// The first page is fetched when the stream is opened so the header is
/// known; later pages are fetched on demand as rows are consumed.
///
/// Only DML results repeat the column labels as their first row; DDL and
/// utility results (`SHOW`, `DESCRIBE`) start with data.
pub struct SdkResultStream {
    client: aws_sdk_athena::Client,
    query_id: String,
    header: Vec<String>,
    columns: Vec<Column>,
    buffer: VecDeque<Row>,
    next_token: Option<String>,
}

impl SdkResultStream {
    pub async fn open(
        client: aws_sdk_athena::Client,
        query_id: String,
        statement_type: Option<&StatementType>,
    ) -> Result<Self, AthenaError> {
        let page = fetch_page(&client, &query_id, None).await?;
        let columns = page_columns(&page)?;
        let mut raw = page_rows(&page);
        strip_header_row(&mut raw, &columns, statement_type);

        let buffer = raw.iter().map(|r| typed_row(r, &columns)).collect();
        let next_token = page.next_token().map(str::to_string);

        debug!(
            query_id = %query_id,
            columns = columns.len(),
            more_pages = next_token.is_some(),
            "Opened Athena result stream"
        );

        Ok(Self {
            client,
            query_id,
            header: columns.iter().map(|c| c.name.clone()).collect(),
            columns,
            buffer,
            next_token,
        })
    }
}

#[async_trait]
impl ResultStream for SdkResultStream {
    fn header(&self) -> &[String] {
        &self.header
    }

    async fn next_row(&mut self) -> quarry_core::Result<Option<Row>> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Ok(Some(row));
            }
            let Some(token) = self.next_token.take() else {
                return Ok(None);
            };

            let page = fetch_page(&self.client, &self.query_id, Some(token)).await?;
            let rows = page_rows(&page);
            debug!(query_id = %self.query_id, rows = rows.len(), "Fetched result page");

            self.buffer
                .extend(rows.iter().map(|r| typed_row(r, &self.columns)));
            self.next_token = page.next_token().map(str::to_string);
        }
    }
}

async fn fetch_page(
    client: &aws_sdk_athena::Client,
    query_id: &str,
    token: Option<String>,
) -> Result<GetQueryResultsOutput, AthenaError> {
    client
        .get_query_results()
        .query_execution_id(query_id)
        .max_results(PAGE_SIZE)
        .set_next_token(token)
        .send()
        .await
        .map_err(sdk_err)
}

fn page_columns(page: &GetQueryResultsOutput) -> Result<Vec<Column>, AthenaError> {
    let result_set = page
        .result_set()
        .ok_or_else(|| AthenaError::ParseError("No ResultSet in response".into()))?;

    Ok(result_set
        .result_set_metadata()
        .map(|meta| {
            meta.column_info()
                .iter()
                .map(|ci| Column::new(ci.name(), ci.r#type()))
                .collect()
        })
        .unwrap_or_default())
}

fn page_rows(page: &GetQueryResultsOutput) -> Vec<Vec<Option<String>>> {
    page.result_set()
        .map(|rs| {
            rs.rows()
                .iter()
                .map(|row| {
                    row.data()
                        .iter()
                        .map(|datum| datum.var_char_value().map(str::to_string))
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Drop the echoed label row that leads the first page of a DML result.
fn strip_header_row(
    raw: &mut Vec<Vec<Option<String>>>,
    columns: &[Column],
    statement_type: Option<&StatementType>,
) {
    if statement_type == Some(&StatementType::Dml)
        && raw.first().is_some_and(|row| is_header_row(row, columns))
    {
        raw.remove(0);
    }
}

/// Whether `row` just echoes the column labels.
fn is_header_row(row: &[Option<String>], columns: &[Column]) -> bool {
    !columns.is_empty()
        && row.len() == columns.len()
        && row
            .iter()
            .zip(columns)
            .all(|(cell, col)| cell.as_deref() == Some(col.name.as_str()))
}

fn typed_row(raw: &[Option<String>], columns: &[Column]) -> Row {
    raw.iter()
        .enumerate()
        .map(|(i, cell)| {
            let data_type = columns.get(i).map(|c| c.data_type.as_str()).unwrap_or("varchar");
            parse_value(cell.as_deref(), data_type)
        })
        .collect()
}
