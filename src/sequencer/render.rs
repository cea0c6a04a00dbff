//! Projection of a scrap onto a markup tree
//!
//! The tree carries the attribute contract presentation layers rely on:
//! `data-wait-type`, `data-ms`, `data-start-time`, `data-emote` on every
//! entry span, and `waiting`/`hidden` classes for visibility.

use std::fmt::Write;

use super::area::AreaManager;
use super::scrap::{CharEntry, EntryKind, Paragraph, ParagraphNode, Scrap, Section};

/// Element of the projected tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderNode {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// All descendants in document order, depth first
    pub fn descendants(&self) -> Vec<&RenderNode> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    /// Serialise as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        if self.tag == "br" {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn project_entry(entry: &CharEntry) -> RenderNode {
    let mut node = RenderNode::new("span").class("char");
    match &entry.kind {
        EntryKind::Glyph(c) => node.text = Some(c.to_string()),
        EntryKind::Emote(name) => node = node.class("emote").attr("data-emote", name),
        EntryKind::Terminal => {
            if let Some(tier) = entry.wait_type {
                node = node.class(tier.name());
            }
        }
    }
    if let Some(tier) = entry.wait_type {
        node = node.attr("data-wait-type", tier);
    }
    node = node
        .attr("data-ms", entry.delay_ms)
        .attr("data-start-time", entry.timestamp);
    if !entry.visible {
        node = node.class("waiting");
    } else if entry.fading {
        node = node.class("fading");
    }
    node
}

fn project_paragraph(paragraph: &Paragraph) -> RenderNode {
    let mut node = RenderNode::new("p")
        .class("paragraph")
        .attr("data-actor", &paragraph.actor);
    for child in paragraph.nodes() {
        node.children.push(match child {
            ParagraphNode::Char(entry) => project_entry(entry),
            ParagraphNode::LineBreak => RenderNode::new("br"),
        });
    }
    node
}

fn project_section(section: &Section, areas: &AreaManager) -> RenderNode {
    let mut node = RenderNode::new("div");
    match areas.records().iter().find(|r| r.index == section.index) {
        Some(record) => {
            for class in record.classes() {
                node = node.class(class);
            }
        }
        None => node = node.class("section").class(&section.area_class),
    }
    node = node.attr("data-section-index", section.index);
    for paragraph in section.paragraphs() {
        node.children.push(project_paragraph(paragraph));
    }
    if let Some(terminal) = section.terminal() {
        node.children.push(project_entry(terminal));
    }
    node
}

/// Build the markup tree for a scrap
pub fn project(scrap: &Scrap, areas: &AreaManager) -> RenderNode {
    let mut root = RenderNode::new("div")
        .class("scrap")
        .class(&scrap.scrap_class);
    for section in scrap.sections() {
        root.children.push(project_section(section, areas));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas() -> AreaManager {
        AreaManager::new(vec!["area1".to_string(), "area2".to_string()]).unwrap()
    }

    fn sample_scrap() -> Scrap {
        let mut scrap = Scrap::new(1);
        let mut section = Section::new(1, "area1");
        let mut p = Paragraph::new("alice");
        p.push_entry(CharEntry::glyph('<'));
        p.push_break();
        p.push_entry(CharEntry::emote("smile"));
        p.push_entry(CharEntry::glyph('!'));
        section.push_paragraph(p);
        section.close();
        scrap.push_section(section);
        scrap
    }

    #[test]
    fn test_project_structure() {
        let tree = project(&sample_scrap(), &areas());
        assert!(tree.has_class("scrap1"));
        let section = &tree.children[0];
        assert_eq!(section.get_attr("data-section-index"), Some("1"));
        let paragraph = &section.children[0];
        assert_eq!(paragraph.get_attr("data-actor"), Some("alice"));
        // '<', br, emote, '!', period terminal
        assert_eq!(paragraph.children.len(), 5);
        assert_eq!(paragraph.children[1].tag, "br");
        assert_eq!(paragraph.children[2].get_attr("data-emote"), Some("smile"));
        assert_eq!(paragraph.children[2].get_attr("data-wait-type"), None);
        assert_eq!(paragraph.children[3].get_attr("data-wait-type"), Some("d"));
        assert!(paragraph.children[4].has_class("period"));
        assert!(section.children[1].has_class("section"));
        assert_eq!(section.children[1].get_attr("data-wait-type"), Some("section"));
    }

    #[test]
    fn test_waiting_class_follows_visibility() {
        let mut scrap = sample_scrap();
        if let Some(e) = scrap.entries_mut().next() {
            e.visible = false;
        }
        let tree = project(&scrap, &areas());
        let spans: Vec<_> = tree
            .descendants()
            .into_iter()
            .filter(|n| n.tag == "span")
            .collect();
        assert!(spans[0].has_class("waiting"));
        assert!(!spans[1].has_class("waiting"));
    }

    #[test]
    fn test_to_html_escapes() {
        let html = project(&sample_scrap(), &areas()).to_html();
        assert!(html.starts_with("<div class=\"scrap scrap1\">"));
        assert!(html.contains(">&lt;</span>"));
        assert!(html.contains("<br>"));
        assert!(!html.contains("</br>"));
        assert!(html.contains("data-emote=\"smile\""));
    }
}
