//! One-shot loading of the relational record file: a CSV with at least
//! `Source`, `Target` and `Weight` columns, fetched from the server at
//! startup. A load failure is terminal; no diagram is drawn and no retry
//! is attempted.

use std::collections::HashMap;

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::types::Record;

const SOURCE_COLUMN: &str = "Source";
const TARGET_COLUMN: &str = "Target";
const WEIGHT_COLUMN: &str = "Weight";

/// Errors from fetching or parsing the data file.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataError {
	#[error("fetching data failed: {0}")]
	Fetch(String),
	#[error("server answered with status {0}")]
	Http(u16),
	#[error("header is missing the {0} column")]
	MissingColumn(&'static str),
	#[error("line {line}: {message}")]
	Row { line: usize, message: String },
}

fn js_error(value: JsValue) -> DataError {
	DataError::Fetch(
		value
			.as_string()
			.unwrap_or_else(|| format!("{value:?}")),
	)
}

/// Parses CSV text into records. The first non-empty line is the header;
/// columns other than the three required ones are kept in `Record::extra`.
/// Blank input is an empty record set, not an error.
pub fn parse_records(text: &str) -> Result<Vec<Record>, DataError> {
	let mut lines = text
		.lines()
		.enumerate()
		.map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
		.filter(|(_, l)| !l.trim().is_empty());

	let Some((_, header)) = lines.next() else {
		return Ok(Vec::new());
	};
	let columns: Vec<&str> = header.split(',').map(str::trim).collect();
	let position = |name: &'static str| {
		columns
			.iter()
			.position(|c| *c == name)
			.ok_or(DataError::MissingColumn(name))
	};
	let source_idx = position(SOURCE_COLUMN)?;
	let target_idx = position(TARGET_COLUMN)?;
	let weight_idx = position(WEIGHT_COLUMN)?;

	let mut records = Vec::new();
	for (line, row) in lines {
		let fields: Vec<&str> = row.split(',').map(str::trim).collect();
		if fields.len() != columns.len() {
			return Err(DataError::Row {
				line,
				message: format!("expected {} fields, found {}", columns.len(), fields.len()),
			});
		}
		let weight: f64 = fields[weight_idx].parse().map_err(|_| DataError::Row {
			line,
			message: format!("weight {:?} is not a number", fields[weight_idx]),
		})?;
		let extra: HashMap<String, String> = columns
			.iter()
			.zip(&fields)
			.enumerate()
			.filter(|(i, _)| *i != source_idx && *i != target_idx && *i != weight_idx)
			.map(|(_, (name, value))| ((*name).to_owned(), (*value).to_owned()))
			.collect();
		records.push(Record {
			source: fields[source_idx].to_owned(),
			target: fields[target_idx].to_owned(),
			weight,
			extra,
		});
	}
	Ok(records)
}

/// Fetches and parses the record file from `url` via the browser fetch API.
pub async fn fetch_records(url: &str) -> Result<Vec<Record>, DataError> {
	let window = web_sys::window().ok_or_else(|| DataError::Fetch("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error)?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| DataError::Fetch("fetch did not return a Response".into()))?;
	if !response.ok() {
		return Err(DataError::Http(response.status()));
	}
	let body = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?;
	let body = body
		.as_string()
		.ok_or_else(|| DataError::Fetch("response body was not text".into()))?;
	parse_records(&body)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_required_columns() {
		let records = parse_records("Source,Target,Weight\nA,B,3\nB,A,5\n").unwrap();
		assert_eq!(
			records,
			vec![Record::new("A", "B", 3.0), Record::new("B", "A", 5.0)]
		);
	}

	#[test]
	fn keeps_unknown_columns_as_extra_fields() {
		let records = parse_records("Source,Kind,Target,Weight\nA,uses,B,1\n").unwrap();
		assert_eq!(records[0].extra.get("Kind").map(String::as_str), Some("uses"));
		assert_eq!(records[0].source, "A");
		assert_eq!(records[0].weight, 1.0);
	}

	#[test]
	fn tolerates_crlf_and_blank_lines() {
		let records = parse_records("Source,Target,Weight\r\n\r\nA,B,2\r\n").unwrap();
		assert_eq!(records, vec![Record::new("A", "B", 2.0)]);
	}

	#[test]
	fn empty_input_is_an_empty_record_set() {
		assert_eq!(parse_records("").unwrap(), Vec::new());
		assert_eq!(parse_records("  \n \n").unwrap(), Vec::new());
	}

	#[test]
	fn missing_column_is_reported() {
		assert_eq!(
			parse_records("Source,Target\nA,B\n").unwrap_err(),
			DataError::MissingColumn("Weight")
		);
	}

	#[test]
	fn bad_weight_is_reported_with_its_line() {
		let err = parse_records("Source,Target,Weight\nA,B,lots\n").unwrap_err();
		assert_eq!(
			err,
			DataError::Row {
				line: 2,
				message: "weight \"lots\" is not a number".into(),
			}
		);
	}

	#[test]
	fn ragged_row_is_reported() {
		assert!(matches!(
			parse_records("Source,Target,Weight\nA,B\n").unwrap_err(),
			DataError::Row { line: 2, .. }
		));
	}
}
