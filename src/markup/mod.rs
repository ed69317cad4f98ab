//! Placement directives.
//!
//! A page embeds a contact form with `{{contact>}}`. Optional parameters
//! select the destination and fix the subject:
//!
//! ```text
//! {{contact>to=sales|subj=Quote request}}
//! ```

/// Opening marker of a directive.
const DIRECTIVE_OPEN: &str = "{{contact>";

/// Closing marker of a directive.
const DIRECTIVE_CLOSE: &str = "}}";

/// Parameters of one placement directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDirective {
    /// Recipient key.
    pub to: Option<String>,
    /// Fixed subject; the form then has no subject input.
    pub subject: Option<String>,
}

/// A piece of page source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Contact(ContactDirective),
}

/// Parse the parameter text between `{{contact>` and `}}`.
///
/// The text is split on the first `|` into at most two parameters. Each
/// parameter is `key=value`; only `to` and `subj` are recognised.
pub fn parse_params(params: &str) -> ContactDirective {
    let mut directive = ContactDirective::default();

    for param in params.splitn(2, '|') {
        let mut parts = param.split('=');
        let key = parts.next().unwrap_or_default();
        let Some(value) = parts.next() else {
            continue;
        };

        match key {
            "to" => directive.to = Some(value.to_string()),
            "subj" => directive.subject = Some(value.to_string()),
            _ => {}
        }
    }

    directive
}

/// Parse a complete directive such as `{{contact>to=sales}}`.
pub fn parse_directive(text: &str) -> Option<ContactDirective> {
    let params = text
        .strip_prefix(DIRECTIVE_OPEN)?
        .strip_suffix(DIRECTIVE_CLOSE)?;
    if params.contains('}') {
        return None;
    }
    Some(parse_params(params))
}

/// Split page source into text and directives, in document order.
pub fn parse_page(source: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut search_from = 0;

    while let Some(offset) = source[search_from..].find(DIRECTIVE_OPEN) {
        let start = search_from + offset;
        let params_start = start + DIRECTIVE_OPEN.len();

        // Parameters run up to the first `}`, which must open the closing marker
        let matched = source[params_start..].find('}').and_then(|len| {
            let end = params_start + len + DIRECTIVE_CLOSE.len();
            let directive = parse_directive(source.get(start..end)?)?;
            Some((directive, end))
        });

        match matched {
            Some((directive, end)) => {
                if start > text_start {
                    segments.push(Segment::Text(&source[text_start..start]));
                }
                segments.push(Segment::Contact(directive));
                text_start = end;
                search_from = text_start;
            }
            None => search_from = start + 1,
        }
    }

    if text_start < source.len() {
        segments.push(Segment::Text(&source[text_start..]));
    }

    segments
}

/// Replace every directive with the output of `render`.
///
/// `render` is called once per directive in document order; other text is
/// copied unchanged.
pub fn expand_directives<F>(source: &str, mut render: F) -> String
where
    F: FnMut(&ContactDirective) -> String,
{
    let mut out = String::with_capacity(source.len());
    for segment in parse_page(source) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Contact(directive) => out.push_str(&render(&directive)),
        }
    }
    out
}
