use std::collections::HashSet;

use crate::dom::{Dom, NodeId, has_class};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
}

impl SelectorAttrCondition {
    fn matches(&self, attrs: &std::collections::HashMap<String, String>) -> bool {
        match self {
            Self::Exists { key } => attrs.contains_key(key),
            Self::Eq { key, value } => attrs.get(key) == Some(value),
            Self::StartsWith { key, value } => attrs
                .get(key)
                .is_some_and(|actual| !value.is_empty() && actual.starts_with(value.as_str())),
            Self::EndsWith { key, value } => attrs
                .get(key)
                .is_some_and(|actual| !value.is_empty() && actual.ends_with(value.as_str())),
            Self::Contains { key, value } => attrs
                .get(key)
                .is_some_and(|actual| !value.is_empty() && actual.contains(value.as_str())),
            Self::Includes { key, value } => attrs
                .get(key)
                .is_some_and(|actual| actual.split_whitespace().any(|token| token == value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Required,
    Disabled,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

impl Dom {
    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let candidates = self.all_element_nodes();
        Ok(self.filter_matches(candidates, &groups))
    }

    pub(crate) fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self
            .query_selector_all_from(root, selector)?
            .into_iter()
            .next())
    }

    pub(crate) fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut candidates = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut candidates);
        Ok(self.filter_matches(candidates, &groups))
    }

    fn filter_matches(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
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
                SelectorCombinator::AdjacentSibling => self
                    .previous_element_sibling(current)
                    .filter(|sibling| self.matches_step(*sibling, prev_step)),
                SelectorCombinator::GeneralSibling => {
                    let mut cursor = self.previous_element_sibling(current);
                    let mut found = None;
                    while let Some(sibling) = cursor {
                        if self.matches_step(sibling, prev_step) {
                            found = Some(sibling);
                            break;
                        }
                        cursor = self.previous_element_sibling(sibling);
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
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        if !step.attrs.iter().all(|cond| cond.matches(&element.attrs)) {
            return false;
        }

        step.pseudo_classes.iter().all(|pseudo| match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::Required => self.required(node_id),
            SelectorPseudoClass::Disabled => self.disabled(node_id),
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
        })
    }

    fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = self.children(parent);
        let pos = children.iter().position(|id| *id == node_id)?;
        children[pos + 1..]
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = self.children(parent);
        let pos = children.iter().position(|id| *id == node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_selector_groups(selector)?
        .iter()
        .map(|group| parse_selector_chain(group))
        .collect()
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokenize_selector(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

/// Tracks bracket, paren and quote nesting so separators inside `[...]` or
/// `:not(...)` are not treated as structure.
#[derive(Default)]
struct NestingState {
    bracket_depth: usize,
    paren_depth: usize,
    quote: Option<char>,
}

impl NestingState {
    fn feed(&mut self, ch: char, selector: &str) -> Result<()> {
        if let Some(q) = self.quote {
            if ch == q {
                self.quote = None;
            }
            return Ok(());
        }
        match ch {
            '"' | '\'' if self.bracket_depth > 0 => self.quote = Some(ch),
            '[' => self.bracket_depth += 1,
            ']' => {
                self.bracket_depth = self
                    .bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            '(' => self.paren_depth += 1,
            ')' => {
                self.paren_depth = self
                    .paren_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn is_top_level(&self) -> bool {
        self.bracket_depth == 0 && self.paren_depth == 0 && self.quote.is_none()
    }

    fn finish(&self, selector: &str) -> Result<()> {
        if self.is_top_level() {
            Ok(())
        } else {
            Err(Error::UnsupportedSelector(selector.into()))
        }
    }
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut nesting = NestingState::default();

    for ch in selector.chars() {
        if ch == ',' && nesting.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        nesting.feed(ch, selector)?;
        current.push(ch);
    }
    nesting.finish(selector)?;

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut nesting = NestingState::default();

    for ch in selector.chars() {
        if nesting.is_top_level() {
            if matches!(ch, '>' | '+' | '~') {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
                continue;
            }
            if ch.is_ascii_whitespace() {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                continue;
            }
        }
        nesting.feed(ch, selector)?;
        current.push(ch);
    }
    nesting.finish(selector)?;

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    Ok(tokens)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    let unsupported = || Error::UnsupportedSelector(part.into());
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(unsupported());
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                if step.id.replace(id).is_some() {
                    return Err(unsupported());
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || step.universal
                {
                    return Err(unsupported());
                }
                let (tag, next) = parse_selector_ident(part, i).ok_or_else(unsupported)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step == SelectorStep::default() {
        return Err(unsupported());
    }
    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Result<(SelectorPseudoClass, usize)> {
    let unsupported = || Error::UnsupportedSelector(part.into());
    let name_start = start + 1;
    let tail = part.get(name_start..).ok_or_else(unsupported)?;

    if let Some(body) = tail.strip_prefix("not(") {
        let close_pos = find_matching_paren(body).ok_or_else(unsupported)?;
        let inners = parse_selector_groups(&body[..close_pos])?;
        let next = name_start + "not(".len() + close_pos + 1;
        return Ok((SelectorPseudoClass::Not(inners), next));
    }

    let (name, next) = parse_selector_ident(part, name_start).ok_or_else(unsupported)?;
    let pseudo = match name.as_str() {
        "first-child" => SelectorPseudoClass::FirstChild,
        "last-child" => SelectorPseudoClass::LastChild,
        "required" => SelectorPseudoClass::Required,
        "disabled" => SelectorPseudoClass::Disabled,
        _ => return Err(unsupported()),
    };
    Ok((pseudo, next))
}

fn find_matching_paren(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;

    for (idx, b) in body.bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut i = skip_ws(open_bracket + 1);
    let key_start = i;
    while i < bytes.len() && (is_selector_ident_char(bytes[i]) || bytes[i] == b':') {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src[key_start..i].to_ascii_lowercase();

    i = skip_ws(i);
    match bytes.get(i) {
        Some(b']') => return Ok((SelectorAttrCondition::Exists { key }, i + 1)),
        None => return Err(unsupported()),
        _ => {}
    }

    let (op, after_op) = match (bytes[i], bytes.get(i + 1)) {
        (b'=', _) => (b'=', i + 1),
        (b'^' | b'$' | b'*' | b'~', Some(b'=')) => (bytes[i], i + 2),
        _ => return Err(unsupported()),
    };

    i = skip_ws(after_op);
    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = skip_ws(after_value);
    if bytes.get(i) != Some(&b']') {
        return Err(unsupported());
    }

    let cond = match op {
        b'^' => SelectorAttrCondition::StartsWith { key, value },
        b'$' => SelectorAttrCondition::EndsWith { key, value },
        b'*' => SelectorAttrCondition::Contains { key, value },
        b'~' => SelectorAttrCondition::Includes { key, value },
        _ => SelectorAttrCondition::Eq { key, value },
    };
    Ok((cond, i + 1))
}

fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(Error::UnsupportedSelector(src.into()));
    };

    if first == b'"' || first == b'\'' {
        let close = src[start + 1..]
            .find(first as char)
            .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
        let end = start + 1 + close;
        return Ok((src[start + 1..end].to_string(), end + 1));
    }

    let mut end = start;
    while end < bytes.len() && bytes[end] != b']' && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    if end == start {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    Ok((src[start..end].to_string(), end))
}
