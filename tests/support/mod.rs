//! Shared helpers for integration tests: in-memory package archives.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const NS: &str = "http://www.appian.com/ae/types/2009";

/// Builds a package zip entry by entry, in insertion order.
#[derive(Default)]
pub struct PackageBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, path: &str, body: impl AsRef<[u8]>) -> Self {
        self.entries.push((path.to_string(), body.as_ref().to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (path, body) in &self.entries {
            writer.start_file(path.clone(), options).unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

/// A `contentHaul` wrapping one child with optional name and definition.
pub fn content_haul(child: &str, name: &str, definition: Option<&str>) -> String {
    let definition = definition
        .map(|d| format!("<definition>{}</definition>", d))
        .unwrap_or_default();
    format!(
        "<contentHaul><{child}><name>{name}</name><uuid>uuid-{name}</uuid>{definition}</{child}></contentHaul>",
        child = child,
        name = name,
        definition = definition
    )
}

pub fn interface(name: &str, definition: &str) -> String {
    content_haul("interface", name, Some(definition))
}

/// A package shaped like a real export: several object kinds plus entries
/// that must be ignored.
pub fn sample_package() -> Vec<u8> {
    PackageBuilder::new()
        .entry("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n")
        .entry(
            "content/grid.xml",
            interface(
                "AX_CaseGrid",
                "a!localVariables(#\"SYSTEM_SYSRULES_gridField_v2\"(data: local!rows))",
            ),
        )
        .entry(
            "content/form.xml",
            interface("AX_CaseForm", "a!formLayout(contents: a!textField(label: \"Title\"))"),
        )
        .entry(
            "content/rule.xml",
            content_haul("rule", "AX_formatDate", Some("text(ri!date, \"yyyy-mm-dd\")")),
        )
        .entry("content/folder.xml", content_haul("folder", "Case Rules", None))
        .entry(
            "recordType/case.xml",
            format!(
                r#"<recordTypeHaul xmlns:a="{ns}"><recordType name="Case" a:uuid="rt-1"/></recordTypeHaul>"#,
                ns = NS
            ),
        )
        .entry(
            "processModel/pm.xml",
            "<processModelHaul><process_model_port><name>Create Case</name><uuid>pm-1</uuid></process_model_port></processModelHaul>",
        )
        .entry("group/admins.xml", "<groupHaul><group><name>Admins</name></group></groupHaul>")
        .build()
}
