//! Sandboxed frames for self-sizing documents (Bokeh widgets, whole HTML reports).
//!
//! The framed document reports its own height through a `ResizeObserver` and `postMessage`. The
//! observer disconnects after `resize_timeout_ms` or when the frame document is torn down. The
//! hosting page applies the reported height, clamped to `max_height_px` (see [`crate::page`]).

use crate::html;

pub const FRAME_MESSAGE_KEY: &str = "kysoFrame";
/// Hex digits of the document digest kept in a frame id.
pub const FRAME_ID_HEX_LEN: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePolicy {
	pub resize_timeout_ms: u64,
	pub max_height_px: u32,
}
impl Default for FramePolicy {
	fn default() -> Self {
		Self { resize_timeout_ms: 10_000, max_height_px: 4_000 }
	}
}
impl From<&kyso_config::Render> for FramePolicy {
	fn from(cfg: &kyso_config::Render) -> Self {
		Self { resize_timeout_ms: cfg.frame_resize_timeout_ms, max_height_px: cfg.frame_max_height_px }
	}
}

pub fn render_frame(document: &str, policy: &FramePolicy, class: &str) -> String {
	let id = frame_id(document);
	let srcdoc = format!("{document}{}", observer_script(&id, policy));

	format!(
		"<iframe class=\"{class}\" data-frame-id=\"{id}\" data-max-height=\"{max}\" \
		 sandbox=\"allow-scripts allow-popups\" loading=\"lazy\" \
		 style=\"width:100%;border:0;height:150px\" srcdoc=\"{srcdoc}\"></iframe>\n",
		class = html::escape(class),
		max = policy.max_height_px,
		srcdoc = html::escape(&srcdoc),
	)
}

/// Stable id for a framed document. Identical documents share an id and therefore a height, across
/// builds and toolchains.
pub fn frame_id(document: &str) -> String {
	let digest = blake3::hash(document.as_bytes()).to_hex();

	format!("frame-{}", &digest[..FRAME_ID_HEX_LEN])
}

fn observer_script(id: &str, policy: &FramePolicy) -> String {
	format!(
		"<script>(function(){{\
var root=document.documentElement;\
var report=function(){{parent.postMessage({{{key}:\"{id}\",height:root.scrollHeight}},\"*\");}};\
var observer=new ResizeObserver(report);\
observer.observe(root);\
report();\
var stop=function(){{observer.disconnect();}};\
setTimeout(stop,{timeout});\
addEventListener(\"pagehide\",stop);\
}})();</script>",
		key = FRAME_MESSAGE_KEY,
		timeout = policy.resize_timeout_ms,
	)
}
