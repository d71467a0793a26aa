use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid {kind} template: {source}")]
    Template {
        kind: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Cannot render {kind} template: {source}")]
    Render {
        kind: &'static str,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Cannot write {0}: {1}")]
    Io(String, #[source] std::io::Error),
}
