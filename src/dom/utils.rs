use markup5ever_rcdom::{Handle, NodeData};

pub(crate) trait NodeExt {
    fn get_tag_name(&self) -> Option<String>;
    fn get_attributes(&self) -> Vec<(String, String)>;
    fn get_text_content(&self) -> String;
    fn get_own_text(&self) -> String;
}

impl NodeExt for Handle {
    fn get_tag_name(&self) -> Option<String> {
        if let NodeData::Element { ref name, .. } = self.data {
            Some(name.local.to_string())
        } else {
            None
        }
    }

    fn get_attributes(&self) -> Vec<(String, String)> {
        if let NodeData::Element { ref attrs, .. } = self.data {
            let attrs = attrs.borrow();
            attrs
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        } else {
            Vec::new()
        }
    }

    fn get_text_content(&self) -> String {
        let mut content = String::new();
        extract_text(self, &mut content);
        collapse_whitespace(&content)
    }

    fn get_own_text(&self) -> String {
        let mut content = String::new();
        for child in self.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child.data {
                content.push_str(&contents.borrow());
                content.push(' ');
            }
        }
        collapse_whitespace(&content)
    }
}

pub(crate) fn extract_text(handle: &Handle, output: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        // Script and style bodies are not rendered text.
        NodeData::Element { ref name, .. }
            if matches!(&*name.local, "script" | "style" | "template") => {}
        _ => {
            for child in handle.children.borrow().iter() {
                extract_text(child, output);
                output.push(' ');
            }
        }
    }
}

pub(crate) fn walk_dom<F>(handle: &Handle, mut callback: F)
where
    F: FnMut(&Handle),
{
    let mut stack = vec![handle.clone()];

    while let Some(current) = stack.pop() {
        callback(&current);

        for child in current.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn is_void_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
