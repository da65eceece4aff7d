//! nbformat 4 JSON builders for rendering tests.

use serde_json::{Value, json};

pub const PLOTLY_MIME: &str = "application/vnd.plotly.v1+json";

/// One-pixel PNG, base64 encoded.
pub const TINY_PNG_BASE64: &str =
	"iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub fn notebook(cells: Vec<Value>) -> Value {
	json!({
		"cells": cells,
		"metadata": {
			"kernelspec": { "display_name": "Python 3", "language": "python", "name": "python3" }
		},
		"nbformat": 4,
		"nbformat_minor": 5
	})
}

pub fn markdown_cell(id: &str, source: &str) -> Value {
	json!({ "cell_type": "markdown", "id": id, "metadata": {}, "source": split_lines(source) })
}

pub fn raw_cell(id: &str, source: &str) -> Value {
	json!({ "cell_type": "raw", "id": id, "metadata": {}, "source": source })
}

pub fn code_cell(id: &str, source: &str, execution_count: Option<u32>, outputs: Vec<Value>) -> Value {
	json!({
		"cell_type": "code",
		"id": id,
		"metadata": {},
		"execution_count": execution_count,
		"source": split_lines(source),
		"outputs": outputs
	})
}

pub fn stream_output(name: &str, text: &str) -> Value {
	json!({ "output_type": "stream", "name": name, "text": split_lines(text) })
}

pub fn error_output(ename: &str, evalue: &str) -> Value {
	json!({
		"output_type": "error",
		"ename": ename,
		"evalue": evalue,
		"traceback": [format!("\u{1b}[0;31m{ename}\u{1b}[0m: {evalue}")]
	})
}

pub fn display_data(data: Value) -> Value {
	json!({ "output_type": "display_data", "data": data, "metadata": {} })
}

pub fn execute_result(execution_count: u32, data: Value) -> Value {
	json!({
		"output_type": "execute_result",
		"execution_count": execution_count,
		"data": data,
		"metadata": {}
	})
}

pub fn plotly_figure() -> Value {
	json!({
		"data": [{ "type": "scatter", "x": [1, 2, 3], "y": [2, 4, 8] }],
		"layout": { "title": { "text": "growth" } }
	})
}

/// A notebook touching every input kind and every output renderer.
pub fn sample_notebook() -> Value {
	notebook(vec![
		markdown_cell("intro", "title: Quarterly results\nauthor: Ada\n\n# Results\n\n![chart](chart.png)"),
		code_cell(
			"load",
			"import pandas as pd\nprint('loaded')",
			Some(1),
			vec![stream_output("stdout", "loaded\n")],
		),
		code_cell(
			"plot",
			"fig.show()",
			Some(2),
			vec![display_data(json!({ PLOTLY_MIME: plotly_figure(), "text/plain": ["<Figure>"] }))],
		),
		code_cell(
			"table",
			"df.head()",
			Some(3),
			vec![execute_result(
				3,
				json!({ "text/html": ["<table><tr><td>1</td></tr></table>"], "text/plain": ["   a\n0  1"] }),
			)],
		),
		code_cell(
			"image",
			"plt.plot()",
			Some(4),
			vec![display_data(json!({ "image/png": TINY_PNG_BASE64, "text/plain": ["<Figure>"] }))],
		),
		code_cell("fail", "1 / 0", Some(5), vec![error_output("ZeroDivisionError", "division by\n  zero")]),
		raw_cell("raw", "raw text"),
		code_cell("empty", "", None, vec![]),
	])
}

fn split_lines(text: &str) -> Vec<String> {
	text.split_inclusive('\n').map(str::to_string).collect()
}
