use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("XML syntax error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Text encoding error at byte {position}: {message}")]
    Encoding { position: u64, message: String },

    #[error("Missing <{0}> root element")]
    MissingRoot(&'static str),

    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
}

impl DescriptionError {
    pub(crate) fn xml(position: u64, source: quick_xml::Error) -> Self {
        DescriptionError::Xml { position, source }
    }

    pub(crate) fn encoding(position: u64, message: impl ToString) -> Self {
        DescriptionError::Encoding {
            position,
            message: message.to_string(),
        }
    }
}
