//! Lecture séquentielle d'un document de description.
//!
//! Le [`DescriptionScanner`] transforme le flux d'événements `quick-xml` en une
//! suite de [`Token`] simplifiés : les préfixes de namespace sont retirés, les
//! attributs sont déséchappés et le texte est regroupé puis nettoyé de ses
//! espaces de bord. Les commentaires, instructions de traitement et doctypes
//! sont ignorés.

use quick_xml::{Reader, escape::resolve_predefined_entity, events::Event};

use crate::{errors::DescriptionError, node::ElementInfo};

/// Élément lexical produit par le scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Balise ouvrante `<name ...>`
    Start(ElementInfo),
    /// Balise auto-fermante `<name .../>`
    Empty(ElementInfo),
    /// Balise fermante `</name>`
    End(String),
    /// Contenu textuel (jamais vide)
    Text(String),
}

impl Token {
    /// Nom local de l'élément pour les balises, `None` pour le texte.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Token::Start(element) | Token::Empty(element) => Some(element.name()),
            Token::End(name) => Some(name),
            Token::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }
}

/// Scanner « forward-only » sur un document XML en mémoire.
pub struct DescriptionScanner<'a> {
    reader: Reader<&'a [u8]>,
    pending_text: String,
    queued: Option<Token>,
}

impl<'a> DescriptionScanner<'a> {
    pub fn new(xml: &'a str) -> Self {
        let reader = Reader::from_str(xml);
        Self {
            reader,
            pending_text: String::new(),
            queued: None,
        }
    }

    /// Position courante (en octets) dans le document.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Retourne le token suivant, ou `None` en fin de document.
    pub fn next_token(&mut self) -> Result<Option<Token>, DescriptionError> {
        if let Some(token) = self.queued.take() {
            return Ok(Some(token));
        }

        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| DescriptionError::xml(self.reader.error_position() as u64, e))?;

            let token = match event {
                Event::Start(e) => Token::Start(self.element_info(&e)?),
                Event::Empty(e) => Token::Empty(self.element_info(&e)?),
                Event::End(e) => {
                    Token::End(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
                }
                Event::Text(e) => {
                    let text = e
                        .decode()
                        .map_err(|err| DescriptionError::encoding(self.position(), err))?;
                    self.pending_text.push_str(&text);
                    continue;
                }
                Event::CData(e) => {
                    let text = e
                        .decode()
                        .map_err(|err| DescriptionError::encoding(self.position(), err))?;
                    self.pending_text.push_str(&text);
                    continue;
                }
                Event::GeneralRef(e) => {
                    let resolved = e
                        .resolve_char_ref()
                        .map_err(|err| DescriptionError::xml(self.position(), err))?;
                    match resolved {
                        Some(ch) => self.pending_text.push(ch),
                        None => {
                            let name = e
                                .decode()
                                .map_err(|err| DescriptionError::encoding(self.position(), err))?;
                            match resolve_predefined_entity(&name) {
                                Some(value) => self.pending_text.push_str(value),
                                // Entité inconnue : on la conserve telle quelle
                                None => {
                                    self.pending_text.push('&');
                                    self.pending_text.push_str(&name);
                                    self.pending_text.push(';');
                                }
                            }
                        }
                    }
                    continue;
                }
                Event::Eof => return Ok(self.flush_text()),
                _ => continue,
            };

            return Ok(match self.flush_text() {
                Some(text) => {
                    self.queued = Some(token);
                    Some(text)
                }
                None => Some(token),
            });
        }
    }

    fn flush_text(&mut self) -> Option<Token> {
        let text = std::mem::take(&mut self.pending_text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Token::Text(trimmed.to_string()))
        }
    }

    fn element_info(
        &self,
        start: &quick_xml::events::BytesStart<'_>,
    ) -> Result<ElementInfo, DescriptionError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut element = ElementInfo::new(name);

        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|e| DescriptionError::xml(self.position(), quick_xml::Error::from(e)))?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .decode_and_unescape_value(self.reader.decoder())
                .map_err(|e| DescriptionError::xml(self.position(), e))?;
            element.set_attribute(key, value.into_owned());
        }

        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<Token> {
        let mut scanner = DescriptionScanner::new(xml);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token().unwrap() {
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let tokens = collect(r#"<s:Envelope xmlns:s="x"><s:Body/></s:Envelope>"#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].element_name(), Some("Envelope"));
        assert!(matches!(&tokens[1], Token::Empty(e) if e.name() == "Body"));
        assert_eq!(tokens[2], Token::End("Envelope".to_string()));
    }

    #[test]
    fn test_text_is_trimmed_and_unescaped() {
        let tokens = collect("<a>\n   Rock &amp; Roll  \n</a>");
        assert_eq!(tokens[1], Token::Text("Rock & Roll".to_string()));
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let tokens = collect("<a>\n  <b>x</b>\n</a>");
        assert_eq!(tokens.iter().filter(|t| t.is_text()).count(), 1);
    }

    #[test]
    fn test_comments_are_ignored() {
        let tokens = collect("<?xml version=\"1.0\"?><!-- hello --><a>1</a>");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_attributes_are_decoded() {
        let tokens = collect(r#"<stateVariable sendEvents="no" dt:x="a&lt;b"/>"#);
        match &tokens[0] {
            Token::Empty(e) => {
                assert_eq!(e.attribute("sendEvents"), "no");
                assert_eq!(e.attribute("x"), "a<b");
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let mut scanner = DescriptionScanner::new("<a><b></a>");
        let mut result = Ok(None);
        for _ in 0..5 {
            result = scanner.next_token();
            if result.is_err() {
                break;
            }
        }
        assert!(result.is_err());
    }
}
