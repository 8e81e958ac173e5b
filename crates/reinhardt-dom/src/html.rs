//! HTML serialization of host nodes.

use std::borrow::Cow;

use crate::node::{Node, NodeKind};

impl Node {
	/// Serializes this node and its descendants.
	///
	/// Inline styles set through [`Node::set_style_property`] are emitted as
	/// the `style` attribute and take precedence over a plain `style`
	/// attribute.
	pub fn outer_html(&self) -> String {
		let mut output = String::new();
		self.render_into(&mut output);
		output
	}

	/// Serializes the children of this node.
	pub fn inner_html(&self) -> String {
		let mut output = String::new();
		for child in self.child_nodes() {
			child.render_into(&mut output);
		}
		output
	}

	fn render_into(&self, output: &mut String) {
		match self.kind() {
			NodeKind::Element(tag) => {
				output.push('<');
				output.push_str(tag);
				let style = self.style_text();
				self.with_state(|state| {
					for (name, value) in state.attributes {
						if name == "style" && !style.is_empty() {
							continue;
						}
						push_attribute(output, name, value);
					}
					if !style.is_empty() {
						push_attribute(output, "style", &style);
					}
				});

				if is_void(tag) {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in self.child_nodes() {
						child.render_into(output);
					}
					output.push_str("</");
					output.push_str(tag);
					output.push('>');
				}
			}
			NodeKind::Text => self.with_state(|state| output.push_str(&html_escape(state.text))),
			NodeKind::Comment => self.with_state(|state| {
				output.push_str("<!--");
				output.push_str(state.text);
				output.push_str("-->");
			}),
		}
	}
}

fn push_attribute(output: &mut String, name: &str, value: &str) {
	output.push(' ');
	output.push_str(name);
	if !value.is_empty() {
		output.push_str("=\"");
		output.push_str(&html_escape(value));
		output.push('"');
	}
}

fn is_void(tag: &str) -> bool {
	matches!(
		tag,
		"area"
			| "base" | "br"
			| "col" | "embed"
			| "hr" | "img"
			| "input" | "link"
			| "meta" | "source"
			| "track" | "wbr"
	)
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_serializes_nested_markup() {
		let div = Node::element("div");
		div.set_attribute("class", "card");
		let strong = Node::element("strong");
		strong.append_child(&Node::text("a < b")).unwrap();
		div.append_child(&strong).unwrap();
		div.append_child(&Node::comment("anchor")).unwrap();
		div.append_child(&Node::element("br")).unwrap();

		assert_eq!(
			div.outer_html(),
			r#"<div class="card"><strong>a &lt; b</strong><!--anchor--><br /></div>"#
		);
	}

	#[rstest]
	fn test_boolean_attribute_has_no_value() {
		let input = Node::element("input");
		input.set_attribute("required", "");

		assert_eq!(input.outer_html(), "<input required />");
	}

	#[rstest]
	fn test_inline_style_overrides_style_attribute() {
		let span = Node::element("span");
		span.set_attribute("style", "color: red");
		span.set_style_property("font-weight", Some("bold"));
		span.set_style_property("color", Some("blue"));

		assert_eq!(
			span.outer_html(),
			r#"<span style="color: blue; font-weight: bold"></span>"#
		);
	}

	#[rstest]
	fn test_inner_html_skips_container() {
		let p = Node::element("p");
		p.append_child(&Node::text("x")).unwrap();
		p.append_child(&Node::text("y")).unwrap();

		assert_eq!(p.inner_html(), "xy");
	}
}
