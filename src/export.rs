//! Spreadsheet export of an on-screen table.

use rust_xlsxwriter::{Format, Workbook};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::{AppError, js_error_text};

pub const SHEET_NAME: &str = "Visual Data";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Cells that read as finite numbers are written as numbers, like a
/// spreadsheet would import them.
fn numeric_value(cell: &str) -> Option<f64> {
	cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// One-sheet workbook: a bold header row followed by `rows`.
pub fn to_xlsx(headers: &[&str], rows: &[Vec<&str>]) -> Result<Vec<u8>, AppError> {
	let mut workbook = Workbook::new();
	let header_format = Format::new().set_bold();

	let worksheet = workbook.add_worksheet();
	worksheet.set_name(SHEET_NAME)?;
	for (c, header) in headers.iter().enumerate() {
		worksheet.write_string_with_format(0, c as u16, *header, &header_format)?;
	}
	for (r, row) in rows.iter().enumerate() {
		let r = r as u32 + 1;
		for (c, cell) in row.iter().enumerate() {
			let c = c as u16;
			match numeric_value(cell) {
				Some(n) => worksheet.write_number(r, c, n)?,
				None => worksheet.write_string(r, c, *cell)?,
			};
		}
	}

	Ok(workbook.save_to_buffer()?)
}

/// Hand an xlsx workbook to the browser as a file download.
pub fn download_xlsx(bytes: &[u8], filename: &str) -> Result<(), AppError> {
	let dom = |e: JsValue| AppError::Dom(js_error_text(&e));

	let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
	let properties = BlobPropertyBag::new();
	properties.set_type(XLSX_MIME);
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties).map_err(dom)?;
	let url = Url::create_object_url_with_blob(&blob).map_err(dom)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| AppError::Dom("no document".into()))?;
	let body = document
		.body()
		.ok_or_else(|| AppError::Dom("no body".into()))?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(dom)?
		.dyn_into()
		.map_err(|_| AppError::Dom("anchor cast failed".into()))?;
	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor.style().set_property("display", "none").map_err(dom)?;

	body.append_child(&anchor).map_err(dom)?;
	anchor.click();
	body.remove_child(&anchor).map_err(dom)?;
	Url::revoke_object_url(&url).map_err(dom)?;

	log::info!("exported {filename} ({} bytes)", bytes.len());
	Ok(())
}
