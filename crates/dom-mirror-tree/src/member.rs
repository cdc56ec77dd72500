//! Mutating members of the tree, named after their DOM counterparts.

use std::fmt;

/// A member of the tree API that can change tree state.
///
/// Setters carry the property name (`textContent`, `id`, ...) and always
/// receive exactly one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {
    // Node
    AppendChild,
    InsertBefore,
    RemoveChild,
    ReplaceChild,
    Normalize,
    TextContent,
    NodeValue,
    // Element
    SetAttribute,
    RemoveAttribute,
    ToggleAttribute,
    Id,
    ClassName,
    InnerHtml,
    // ParentNode
    Append,
    Prepend,
    ReplaceChildren,
    // ChildNode
    Before,
    After,
    ReplaceWith,
    Remove,
    // CharacterData
    AppendData,
    InsertData,
    DeleteData,
    ReplaceData,
    Data,
    // Text
    SplitText,
}

impl Member {
    pub const ALL: [Member; 26] = [
        Member::AppendChild,
        Member::InsertBefore,
        Member::RemoveChild,
        Member::ReplaceChild,
        Member::Normalize,
        Member::TextContent,
        Member::NodeValue,
        Member::SetAttribute,
        Member::RemoveAttribute,
        Member::ToggleAttribute,
        Member::Id,
        Member::ClassName,
        Member::InnerHtml,
        Member::Append,
        Member::Prepend,
        Member::ReplaceChildren,
        Member::Before,
        Member::After,
        Member::ReplaceWith,
        Member::Remove,
        Member::AppendData,
        Member::InsertData,
        Member::DeleteData,
        Member::ReplaceData,
        Member::Data,
        Member::SplitText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Member::AppendChild => "appendChild",
            Member::InsertBefore => "insertBefore",
            Member::RemoveChild => "removeChild",
            Member::ReplaceChild => "replaceChild",
            Member::Normalize => "normalize",
            Member::TextContent => "textContent",
            Member::NodeValue => "nodeValue",
            Member::SetAttribute => "setAttribute",
            Member::RemoveAttribute => "removeAttribute",
            Member::ToggleAttribute => "toggleAttribute",
            Member::Id => "id",
            Member::ClassName => "className",
            Member::InnerHtml => "innerHTML",
            Member::Append => "append",
            Member::Prepend => "prepend",
            Member::ReplaceChildren => "replaceChildren",
            Member::Before => "before",
            Member::After => "after",
            Member::ReplaceWith => "replaceWith",
            Member::Remove => "remove",
            Member::AppendData => "appendData",
            Member::InsertData => "insertData",
            Member::DeleteData => "deleteData",
            Member::ReplaceData => "replaceData",
            Member::Data => "data",
            Member::SplitText => "splitText",
        }
    }

    pub fn from_name(name: &str) -> Option<Member> {
        Member::ALL.iter().copied().find(|m| m.name() == name)
    }

    pub fn is_setter(self) -> bool {
        matches!(
            self,
            Member::TextContent
                | Member::NodeValue
                | Member::Id
                | Member::ClassName
                | Member::InnerHtml
                | Member::Data
        )
    }

    /// Variadic `(Node or string)...` members of the ParentNode/ChildNode mixins.
    pub fn is_variadic(self) -> bool {
        matches!(
            self,
            Member::Append
                | Member::Prepend
                | Member::ReplaceChildren
                | Member::Before
                | Member::After
                | Member::ReplaceWith
        )
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
