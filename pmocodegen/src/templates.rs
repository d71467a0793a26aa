//! Moteur de gabarits.
//!
//! Les gabarits d'un [`SyntaxProvider`] sont enregistrés une fois dans un
//! registre Handlebars sans échappement HTML et en mode strict : une
//! variable manquante est une erreur de rendu, pas une chaîne vide.
//!
//! Deux assistants sont disponibles dans les gabarits :
//! - `{{indent text n}}` indente chaque ligne non vide de `n` niveaux ;
//! - `{{prefix text "/// "}}` préfixe chaque ligne.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, no_escape,
};
use serde::Serialize;
use tracing::trace;

use crate::{
    errors::GeneratorError,
    syntax::{SyntaxProvider, TemplateKind},
};

/// Unité d'indentation du code généré
pub const INDENT: &str = "    ";

pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new<P: SyntaxProvider + ?Sized>(provider: &P) -> Result<Self, GeneratorError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("indent", Box::new(indent_helper));
        registry.register_helper("prefix", Box::new(prefix_helper));

        for kind in TemplateKind::ALL {
            registry
                .register_template_string(kind.name(), provider.template(kind))
                .map_err(|e| GeneratorError::Template {
                    kind: kind.name(),
                    source: Box::new(e),
                })?;
        }

        trace!(provider = provider.name(), "Templates registered");
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, kind: TemplateKind, data: &T) -> Result<String, GeneratorError> {
        self.registry
            .render(kind.name(), data)
            .map_err(|e| GeneratorError::Render {
                kind: kind.name(),
                source: Box::new(e),
            })
    }
}

/// Préfixe chaque ligne de `text` ; les lignes vides restent vides quand
/// `skip_empty` est vrai.
pub fn prefix_lines(text: &str, prefix: &str, skip_empty: bool) -> String {
    text.lines()
        .map(|line| {
            if skip_empty && line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    let levels = h.param(1).and_then(|v| v.value().as_u64()).unwrap_or(1) as usize;
    out.write(&prefix_lines(text, &INDENT.repeat(levels), true))?;
    Ok(())
}

fn prefix_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    let prefix = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&prefix_lines(text, prefix, false))?;
    Ok(())
}
