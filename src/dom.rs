use std::collections::{HashMap, HashSet};

use crate::html::parse_fragment;
use crate::selector::{
    SelectorAttrCondition, SelectorCombinator, SelectorPart, SelectorStep, parse_selector_groups,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node_type: NodeType,
}

/// Element state. Form-control properties live next to the attributes so
/// that `value`/`checked` can diverge from their markup defaults the way
/// they do in a browser.
#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attrs: HashMap<String, String>,
    value: String,
    checked: bool,
    disabled: bool,
    required: bool,
}

impl Element {
    fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let required = attrs.contains_key("required");
        Self {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
            required,
        }
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    fn class_tokens(&self) -> Vec<String> {
        self.attrs
            .get("class")
            .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
            .unwrap_or_default()
    }

    fn set_class_tokens(&mut self, classes: &[String]) {
        if classes.is_empty() {
            self.attrs.remove("class");
        } else {
            self.attrs.insert("class".to_string(), classes.join(" "));
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let id = self.create_node(
            Some(parent),
            NodeType::Element(Element::new(tag_name.to_ascii_lowercase(), attrs)),
        );
        if let Some(id_attr) = self.attr(id, "id") {
            if !id_attr.is_empty() && self.is_connected(id) {
                self.id_index.entry(id_attr).or_insert(id);
            }
        }
        id
    }

    pub(crate) fn create_detached_element(
        &mut self,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_string()))
            .collect();
        self.create_node(
            None,
            NodeType::Element(Element::new(tag_name.to_ascii_lowercase(), attrs)),
        )
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text.to_string()))
    }

    /// Puts `replacement` where `old` was and detaches `old`.
    pub(crate) fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> Result<()> {
        let parent = self
            .parent(old)
            .ok_or_else(|| Error::Dom("replaceWith target has no parent".into()))?;
        self.detach(replacement);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|child| *child == old)
            .ok_or_else(|| Error::Dom("replaceWith target is not a child of its parent".into()))?;
        self.nodes[parent.0].children[position] = replacement;
        self.nodes[replacement.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    fn detach(&mut self, node_id: NodeId) {
        if let Some(parent) = self.nodes[node_id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node_id);
        }
    }

    fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&self, node_id: NodeId, what: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::Dom(format!("{what} target is not an element")))
    }

    fn element_mut_or_err(&mut self, node_id: NodeId, what: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Dom(format!("{what} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Inclusive, like `Node.contains`.
    pub(crate) fn contains(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        ancestor == node_id || self.is_descendant_of(node_id, ancestor)
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        self.contains(self.root, node_id)
    }

    /// The node followed by its ancestors up to the document.
    pub(crate) fn ancestry(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = vec![node_id];
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.parent(current);
        }
        out
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn body(&self) -> Option<NodeId> {
        self.query_selector("body").ok().flatten()
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_or_err(node_id, "textContent")?;
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value);
        }
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> Result<String> {
        self.element_or_err(node_id, "innerHTML")?;
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            out.push_str(&self.dump_node(*child));
        }
        Ok(out)
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        self.element_or_err(node_id, "innerHTML")?;
        let fragment = parse_fragment(html)?;

        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }

        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            self.clone_subtree_from_dom(&fragment, child, node_id)?;
        }

        self.rebuild_id_index();
        Ok(())
    }

    fn clone_subtree_from_dom(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: NodeId,
    ) -> Result<NodeId> {
        let node_type = match &source.nodes[source_node.0].node_type {
            NodeType::Document => {
                return Err(Error::Dom(
                    "cannot clone document node into innerHTML target".into(),
                ));
            }
            NodeType::Element(element) => NodeType::Element(element.clone()),
            NodeType::Text(text) => NodeType::Text(text.clone()),
        };

        let node = self.create_node(Some(parent), node_type);
        for child in &source.nodes[source_node.0].children {
            self.clone_subtree_from_dom(source, *child, node)?;
        }
        Ok(node)
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        Ok(self.element_or_err(node_id, "value")?.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_mut_or_err(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.element_or_err(node_id, "checked")?.checked)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.element_mut_or_err(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "disabled")?;
        element.disabled = disabled;
        if disabled {
            element.attrs.insert("disabled".into(), String::new());
        } else {
            element.attrs.remove("disabled");
        }
        Ok(())
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.required).unwrap_or(false)
    }

    pub(crate) fn set_required(&mut self, node_id: NodeId, required: bool) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "required")?;
        element.required = required;
        if required {
            element.attrs.insert("required".into(), String::new());
        } else {
            element.attrs.remove("required");
        }
        Ok(())
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self.element_mut_or_err(node_id, "setAttribute")?;
        element.attrs.insert(lowered.clone(), value.to_string());
        match lowered.as_str() {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            "disabled" => element.disabled = true,
            "required" => element.required = true,
            _ => {}
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| element.has_class(class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = element.class_tokens();
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        element.set_class_tokens(&classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = element.class_tokens();
        classes.retain(|name| name != class_name);
        element.set_class_tokens(&classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name) {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Option<String> {
        let element = self.element(node_id)?;
        parse_style_declarations(element.attrs.get("style").map(String::as_str))
            .into_iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "style")?;
        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name.to_string(), value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }
        Ok(())
    }

    /// Restores every control under `form` to its markup default, like
    /// `HTMLFormElement.reset()`.
    pub(crate) fn reset_form(&mut self, form: NodeId) -> Result<()> {
        for control in self.query_selector_all_from(form, "input, textarea, select")? {
            let value = self.default_control_value(control)?;
            if let Some(element) = self.element_mut(control) {
                element.value = value;
                element.checked = element.attrs.contains_key("checked");
            }
        }
        Ok(())
    }

    /// Gives every `textarea` and `select` the value its markup implies.
    /// Inputs already read theirs from the `value` attribute.
    pub(crate) fn init_control_values(&mut self) -> Result<()> {
        for control in self.query_selector_all("textarea, select")? {
            let value = self.default_control_value(control)?;
            self.set_value(control, &value)?;
        }
        Ok(())
    }

    /// Text of a `textarea`, the `selected` (else first) option of a
    /// `select`, or the `value` attribute of anything else.
    fn default_control_value(&self, node_id: NodeId) -> Result<String> {
        match self.tag_name(node_id) {
            Some("textarea") => Ok(self.text_content(node_id)),
            Some("select") => {
                let options = self.query_selector_all_from(node_id, "option")?;
                let chosen = options
                    .iter()
                    .copied()
                    .find(|option| self.attr(*option, "selected").is_some())
                    .or_else(|| options.first().copied());
                Ok(chosen
                    .map(|option| self.option_value(option))
                    .unwrap_or_default())
            }
            _ => Ok(self.attr(node_id, "value").unwrap_or_default()),
        }
    }

    /// `value` attribute of an `<option>`, falling back to its trimmed text.
    pub(crate) fn option_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    pub(crate) fn query_selector_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all_from(root, selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    fn filter_matching(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
                    && seen.insert(*candidate)
            })
            .collect()
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.entry(id.clone()).or_insert(node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some(last) = steps.last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, prev_step)),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !element.has_class(class_name))
        {
            return false;
        }

        step.attrs.iter().all(|cond| match cond {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
            SelectorAttrCondition::StartsWith { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|actual| actual.starts_with(value.as_str())),
            SelectorAttrCondition::EndsWith { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|actual| actual.ends_with(value.as_str())),
            SelectorAttrCondition::Contains { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|actual| actual.contains(value.as_str())),
        })
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => escape_html_text(text),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort();
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    if !v.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(v));
                        out.push('"');
                    }
                }
                out.push('>');
                if crate::html::is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }

    /// Short human-readable label for trace lines.
    pub(crate) fn describe(&self, node_id: NodeId) -> String {
        let Some(element) = self.element(node_id) else {
            return if node_id == self.root {
                "document".into()
            } else {
                "#text".into()
            };
        };
        if let Some(id) = element.attrs.get("id") {
            return format!("#{id}");
        }
        let classes = element.class_tokens();
        if classes.is_empty() {
            element.tag_name.clone()
        } else {
            format!("{}.{}", element.tag_name, classes.join("."))
        }
    }
}

fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let Some(style_attr) = style_attr else {
        return Vec::new();
    };
    style_attr
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() {
                None
            } else {
                Some((name, value.to_string()))
            }
        })
        .collect()
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_html_attr(value: &str) -> String {
    escape_html_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    #[test]
    fn closest_and_scoped_queries_follow_the_tree() -> Result<()> {
        let dom = parse_html(
            r#"
            <div class="ticket-type"><h3>VIP</h3><p class="price">500 EGP</p>
              <button class="book-btn" id="vip">Book</button></div>
            <div class="ticket-type"><h3>Regular</h3><p class="price">250 EGP</p></div>
            "#,
        )?;
        let button = dom.by_id("vip").expect("button");
        let card = dom.closest(button, ".ticket-type")?.expect("card");
        let heading = dom.query_selector_from(card, "h3")?.expect("heading");
        assert_eq!(dom.text_content(heading), "VIP");
        assert_eq!(dom.query_selector_all(".ticket-type .price")?.len(), 2);
        assert_eq!(dom.query_selector_all(".ticket-type > .price")?.len(), 2);
        assert_eq!(dom.query_selector_all("body > .price")?.len(), 0);
        Ok(())
    }

    #[test]
    fn class_list_operations_keep_tokens_unique() -> Result<()> {
        let mut dom = parse_html("<nav id='n' class='nav-links'></nav>")?;
        let nav = dom.by_id("n").expect("nav");
        assert!(dom.class_toggle(nav, "active")?);
        dom.class_add(nav, "active")?;
        assert_eq!(dom.attr(nav, "class").as_deref(), Some("nav-links active"));
        assert!(!dom.class_toggle(nav, "active")?);
        dom.class_remove(nav, "nav-links")?;
        assert_eq!(dom.attr(nav, "class"), None);
        Ok(())
    }

    #[test]
    fn style_set_replaces_and_removes_declarations() -> Result<()> {
        let mut dom = parse_html("<div id='m' style='display: none; color: red'></div>")?;
        let modal = dom.by_id("m").expect("modal");
        dom.style_set(modal, "display", "block")?;
        assert_eq!(dom.style_get(modal, "display").as_deref(), Some("block"));
        dom.style_set(modal, "color", "")?;
        assert_eq!(
            dom.attr(modal, "style").as_deref(),
            Some("display: block;")
        );
        Ok(())
    }

    #[test]
    fn reset_form_restores_markup_defaults() -> Result<()> {
        let mut dom = parse_html(
            "<form id='f'><input id='a' value='x'><input id='t' type='checkbox'></form>",
        )?;
        let form = dom.by_id("f").expect("form");
        let input = dom.by_id("a").expect("input");
        let terms = dom.by_id("t").expect("terms");
        dom.set_value(input, "changed")?;
        dom.set_checked(terms, true)?;
        dom.reset_form(form)?;
        assert_eq!(dom.value(input)?, "x");
        assert!(!dom.checked(terms)?);
        Ok(())
    }

    #[test]
    fn select_and_textarea_take_their_markup_values() -> Result<()> {
        let mut dom = parse_html(
            "<form id='f'>\
               <select id='topic'><option value='a'>A</option><option value='b' selected>B</option></select>\
               <select id='plain'><option>First</option><option>Second</option></select>\
               <select id='empty'></select>\
               <textarea id='note'>Hello there</textarea>\
             </form>",
        )?;
        let topic = dom.by_id("topic").expect("topic");
        let plain = dom.by_id("plain").expect("plain");
        let note = dom.by_id("note").expect("note");
        assert_eq!(dom.value(topic)?, "b");
        assert_eq!(dom.value(plain)?, "First");
        assert_eq!(dom.value(dom.by_id("empty").expect("empty"))?, "");
        assert_eq!(dom.value(note)?, "Hello there");

        dom.set_value(topic, "a")?;
        dom.set_value(note, "")?;
        dom.reset_form(dom.by_id("f").expect("form"))?;
        assert_eq!(dom.value(topic)?, "b");
        assert_eq!(dom.value(note)?, "Hello there");
        Ok(())
    }

    #[test]
    fn replace_with_moves_replacement_into_place_and_reindexes() -> Result<()> {
        let mut dom = parse_html("<ul id='l'><li><a id='login' href='login.html'>Login</a></li></ul>")?;
        let link = dom.by_id("login").expect("link");
        let menu = dom.create_detached_element("div", &[("id", "menu")]);
        dom.replace_with(link, menu)?;
        assert!(dom.by_id("login").is_none());
        assert_eq!(dom.by_id("menu"), Some(menu));
        let list = dom.by_id("l").expect("list");
        assert!(dom.contains(list, menu));
        Ok(())
    }

    #[test]
    fn set_inner_html_parses_markup_and_dump_round_trips_text() -> Result<()> {
        let mut dom = parse_html("<button id='b'>Confirm Payment</button>")?;
        let button = dom.by_id("b").expect("button");
        let original = dom.inner_html(button)?;
        dom.set_inner_html(button, "<i class=\"fas fa-spinner\"></i> Processing...")?;
        assert_eq!(dom.text_content(button), " Processing...");
        dom.set_inner_html(button, &original)?;
        assert_eq!(dom.text_content(button), "Confirm Payment");
        Ok(())
    }
}
