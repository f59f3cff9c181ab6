//! rwd HTML Parser
//!
//! HTML5 parser built on html5ever, producing `rwd_dom::Document`s.

mod parser;

pub use parser::HtmlParser;
pub use rwd_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not attach <{tag}>: {source}")]
    Tree {
        tag: String,
        #[source]
        source: rwd_dom::DomError,
    },
}
