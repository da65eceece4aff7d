//! Standalone HTML page around a rendered report, loading the client-side renderers.

use crate::{frame::FRAME_MESSAGE_KEY, html};

const HEAD_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/highlight.js@11.10.0/styles/github.min.css">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js"></script>
<script defer src="https://cdn.jsdelivr.net/npm/highlight.js@11.10.0/lib/common.min.js"></script>
<script defer src="https://cdn.jsdelivr.net/npm/mermaid@11.3.0/dist/mermaid.min.js"></script>
<script defer src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>"#;

pub fn standalone_page(title: &str, body: &str) -> String {
	format!(
		"<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
		 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
		 <title>{title}</title>\n{HEAD_ASSETS}\n</head>\n<body>\n<main class=\"kyso-report\">\n{body}</main>\n\
		 <script>{script}</script>\n</body>\n</html>\n",
		title = html::escape(title),
		script = init_script(),
	)
}

fn init_script() -> String {
	format!(
		"addEventListener(\"message\",function(event){{\
var data=event.data;\
if(!data||typeof data.{key}!==\"string\")return;\
document.querySelectorAll(\"iframe[data-frame-id]\").forEach(function(frame){{\
if(frame.dataset.frameId!==data.{key}||frame.contentWindow!==event.source)return;\
var max=parseInt(frame.dataset.maxHeight,10)||0;\
var height=Math.ceil(Number(data.height)||0);\
frame.style.height=(max>0?Math.min(height,max):height)+\"px\";\
}});\
}});\
addEventListener(\"DOMContentLoaded\",function(){{\
document.querySelectorAll(\".math\").forEach(function(el){{\
katex.render(el.textContent,el,{{displayMode:el.classList.contains(\"math-display\"),throwOnError:false}});\
}});\
document.querySelectorAll(\"pre code.hljs\").forEach(function(el){{hljs.highlightElement(el);}});\
mermaid.initialize({{startOnLoad:false}});\
mermaid.run({{querySelector:\"pre.mermaid\"}});\
document.querySelectorAll(\".plotly-figure\").forEach(function(el){{\
var figure=JSON.parse(el.dataset.figure);\
Plotly.newPlot(el,figure.data,figure.layout||{{}},figure.config||{{responsive:true}});\
}});\
}});",
		key = FRAME_MESSAGE_KEY,
	)
}
