#![allow(dead_code)]

use pmodescription::{DeviceDescription, ServiceDescription};

pub const RENDERING_CONTROL: &str = include_str!("../../../testdata/rendering_control.xml");
pub const MEDIA_RENDERER: &str = include_str!("../../../testdata/media_renderer.xml");

pub fn rendering_control() -> ServiceDescription {
    ServiceDescription::parse(RENDERING_CONTROL).unwrap()
}

pub fn media_renderer() -> DeviceDescription {
    DeviceDescription::parse(MEDIA_RENDERER).unwrap()
}

/// Lignes non vides du source, sans indentation.
pub fn trimmed_lines(source: &str) -> Vec<&str> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Vérifie que `expected` apparaît comme suite de lignes consécutives
/// (indentation et lignes vides ignorées).
pub fn assert_sequence(source: &str, expected: &[&str]) {
    let lines = trimmed_lines(source);
    let found = lines.windows(expected.len()).any(|window| window == expected);
    assert!(found, "sequence {expected:#?} not found in:\n{source}");
}

pub fn assert_line(source: &str, expected: &str) {
    assert_sequence(source, &[expected]);
}

pub fn assert_no_line(source: &str, unexpected: &str) {
    assert!(
        !trimmed_lines(source).contains(&unexpected),
        "unexpected line {unexpected:?} in:\n{source}"
    );
}
