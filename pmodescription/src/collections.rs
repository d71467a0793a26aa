//! Collections de nœuds de description.
//!
//! - [`DescriptionList`] conserve l'ordre de déclaration et l'accès positionnel
//!   (les arguments d'une action, dont l'ordre détermine le passage des
//!   paramètres).
//! - [`DescriptionMap`] indexe les nœuds par leur identité (nom, UDN,
//!   serviceId...). Une identité dupliquée remplace la précédente, une identité
//!   vide reçoit une clé synthétique unique. L'itération suit l'ordre de
//!   première déclaration, ce qui rend la génération reproductible.

use indexmap::IndexMap;
use tracing::debug;

use crate::node::NodeKind;

/// Nœud identifiable par une clé de schéma
pub trait Described {
    const KIND: NodeKind;

    /// Identité du nœud dans sa collection (peut être vide).
    fn identity(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionList<T> {
    items: Vec<T>,
}

impl<T> Default for DescriptionList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> DescriptionList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a DescriptionList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for DescriptionList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DescriptionMap<T: Described> {
    items: IndexMap<String, T>,
    anonymous: usize,
}

impl<T: Described> Default for DescriptionMap<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            anonymous: 0,
        }
    }
}

impl<T: Described> DescriptionMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insère un nœud et retourne la clé sous laquelle il est rangé.
    ///
    /// Un nœud portant une identité déjà connue remplace l'ancien tout en
    /// conservant sa position.
    pub fn insert(&mut self, item: T) -> String {
        let key = match item.identity().trim() {
            "" => loop {
                self.anonymous += 1;
                let candidate = format!("{}#{}", T::KIND, self.anonymous);
                if !self.items.contains_key(&candidate) {
                    break candidate;
                }
            },
            identity => identity.to_string(),
        };

        if self.items.insert(key.clone(), item).is_some() {
            debug!(kind = %T::KIND, key = %key, "Duplicate identity, keeping the last declaration");
        }
        key
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.items.get_index(index).map(|(_, v)| v)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.items.get_index_of(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub(crate) fn into_values(self) -> impl Iterator<Item = T> {
        self.items.into_values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
