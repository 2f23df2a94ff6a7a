//! Built-in semantic dictionary for well-known style symbols
//!
//! Each entry describes what a flag means independently of its bit value.
//! Rule auto-fill copies these attributes into rule documents, but only
//! where the document does not already carry the attribute.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attr {
    Str(&'static str),
    Bool(bool),
    Int(i64),
}

impl Attr {
    pub fn to_value(self) -> Value {
        match self {
            Attr::Str(s) => Value::String(s.to_string()),
            Attr::Bool(b) => Value::Bool(b),
            Attr::Int(i) => Value::from(i),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SemanticEntry {
    pub flag: &'static str,
    pub attributes: &'static [(&'static str, Attr)],
}

use Attr::{Bool, Int, Str};

macro_rules! semantic {
    ($flag:literal => $($key:literal : $value:expr),* $(,)?) => {
        SemanticEntry { flag: $flag, attributes: &[$(($key, $value)),*] }
    };
}

pub const SEMANTIC_DICTIONARY: &[SemanticEntry] = &[
    // Button styles
    semantic!("BS_PUSHBUTTON" => "role": Str("button"), "kind": Str("push")),
    semantic!("BS_DEFPUSHBUTTON" => "role": Str("button"), "kind": Str("push"), "default": Bool(true)),
    semantic!("BS_CHECKBOX" => "role": Str("button"), "kind": Str("checkbox"), "toggle": Bool(true)),
    semantic!("BS_AUTOCHECKBOX" => "role": Str("button"), "kind": Str("checkbox"), "toggle": Bool(true), "auto": Bool(true)),
    semantic!("BS_RADIOBUTTON" => "role": Str("button"), "kind": Str("radio"), "toggle": Bool(true)),
    semantic!("BS_3STATE" => "role": Str("button"), "kind": Str("checkbox"), "toggle": Bool(true), "states": Int(3)),
    semantic!("BS_AUTO3STATE" => "role": Str("button"), "kind": Str("checkbox"), "toggle": Bool(true), "states": Int(3), "auto": Bool(true)),
    semantic!("BS_GROUPBOX" => "role": Str("groupbox"), "container": Bool(true)),
    semantic!("BS_AUTORADIOBUTTON" => "role": Str("button"), "kind": Str("radio"), "toggle": Bool(true), "auto": Bool(true)),
    semantic!("BS_ICON" => "content": Str("icon")),
    semantic!("BS_BITMAP" => "content": Str("bitmap")),
    semantic!("BS_LEFT" => "align": Str("left")),
    semantic!("BS_RIGHT" => "align": Str("right")),
    semantic!("BS_CENTER" => "align": Str("center")),
    semantic!("BS_TOP" => "valign": Str("top")),
    semantic!("BS_BOTTOM" => "valign": Str("bottom")),
    semantic!("BS_VCENTER" => "valign": Str("center")),
    semantic!("BS_PUSHLIKE" => "appearance": Str("pushlike")),
    semantic!("BS_MULTILINE" => "multiline": Bool(true)),
    semantic!("BS_NOTIFY" => "notify": Bool(true)),
    semantic!("BS_FLAT" => "appearance": Str("flat")),
    semantic!("BS_OWNERDRAW" => "ownerdraw": Bool(true)),
    // Edit styles
    semantic!("ES_LEFT" => "role": Str("edit"), "align": Str("left")),
    semantic!("ES_CENTER" => "role": Str("edit"), "align": Str("center")),
    semantic!("ES_RIGHT" => "role": Str("edit"), "align": Str("right")),
    semantic!("ES_MULTILINE" => "role": Str("edit"), "multiline": Bool(true)),
    semantic!("ES_UPPERCASE" => "role": Str("edit"), "case": Str("upper")),
    semantic!("ES_LOWERCASE" => "role": Str("edit"), "case": Str("lower")),
    semantic!("ES_PASSWORD" => "role": Str("edit"), "masking": Bool(true)),
    semantic!("ES_AUTOVSCROLL" => "role": Str("edit"), "scrolling": Str("vertical"), "auto": Bool(true)),
    semantic!("ES_AUTOHSCROLL" => "role": Str("edit"), "scrolling": Str("horizontal"), "auto": Bool(true)),
    semantic!("ES_NOHIDESEL" => "role": Str("edit"), "keepSelection": Bool(true)),
    semantic!("ES_OEMCONVERT" => "role": Str("edit"), "oemConvert": Bool(true)),
    semantic!("ES_READONLY" => "role": Str("edit"), "readonly": Bool(true)),
    semantic!("ES_WANTRETURN" => "role": Str("edit"), "wantReturn": Bool(true)),
    semantic!("ES_NUMBER" => "role": Str("edit"), "input": Str("numeric")),
    // Legacy client edit styles
    semantic!("EBS_LEFT" => "role": Str("edit"), "align": Str("left")),
    semantic!("EBS_CENTER" => "role": Str("edit"), "align": Str("center")),
    semantic!("EBS_RIGHT" => "role": Str("edit"), "align": Str("right")),
    semantic!("EBS_MULTILINE" => "role": Str("edit"), "multiline": Bool(true)),
    semantic!("EBS_PASSWORD" => "role": Str("edit"), "masking": Bool(true)),
    semantic!("EBS_AUTOVSCROLL" => "role": Str("edit"), "scrolling": Str("vertical"), "auto": Bool(true)),
    semantic!("EBS_AUTOHSCROLL" => "role": Str("edit"), "scrolling": Str("horizontal"), "auto": Bool(true)),
    semantic!("EBS_READONLY" => "role": Str("edit"), "readonly": Bool(true)),
    semantic!("EBS_NUMBER" => "role": Str("edit"), "input": Str("numeric")),
    // Static styles
    semantic!("SS_LEFT" => "role": Str("static"), "align": Str("left")),
    semantic!("SS_CENTER" => "role": Str("static"), "align": Str("center")),
    semantic!("SS_RIGHT" => "role": Str("static"), "align": Str("right")),
    semantic!("SS_ICON" => "role": Str("static"), "content": Str("icon")),
    semantic!("SS_BITMAP" => "role": Str("static"), "content": Str("bitmap")),
    semantic!("SS_BLACKRECT" => "role": Str("static"), "content": Str("rect"), "color": Str("black")),
    semantic!("SS_GRAYRECT" => "role": Str("static"), "content": Str("rect"), "color": Str("gray")),
    semantic!("SS_WHITERECT" => "role": Str("static"), "content": Str("rect"), "color": Str("white")),
    semantic!("SS_SIMPLE" => "role": Str("static"), "content": Str("text"), "simple": Bool(true)),
    semantic!("SS_LEFTNOWORDWRAP" => "role": Str("static"), "align": Str("left"), "wrap": Bool(false)),
    semantic!("SS_NOPREFIX" => "role": Str("static"), "prefix": Bool(false)),
    semantic!("SS_NOTIFY" => "role": Str("static"), "notify": Bool(true)),
    semantic!("SS_CENTERIMAGE" => "role": Str("static"), "valign": Str("center")),
    semantic!("SS_SUNKEN" => "role": Str("static"), "frame": Str("sunken")),
    semantic!("SS_ENDELLIPSIS" => "role": Str("static"), "ellipsis": Str("end")),
    // ListBox styles
    semantic!("LBS_NOTIFY" => "role": Str("listbox"), "notify": Bool(true)),
    semantic!("LBS_SORT" => "role": Str("listbox"), "sorted": Bool(true)),
    semantic!("LBS_NOREDRAW" => "role": Str("listbox"), "redraw": Bool(false)),
    semantic!("LBS_MULTIPLESEL" => "role": Str("listbox"), "selection": Str("multiple")),
    semantic!("LBS_OWNERDRAWFIXED" => "role": Str("listbox"), "ownerdraw": Str("fixed")),
    semantic!("LBS_OWNERDRAWVARIABLE" => "role": Str("listbox"), "ownerdraw": Str("variable")),
    semantic!("LBS_HASSTRINGS" => "role": Str("listbox"), "hasStrings": Bool(true)),
    semantic!("LBS_USETABSTOPS" => "role": Str("listbox"), "tabStops": Bool(true)),
    semantic!("LBS_NOINTEGRALHEIGHT" => "role": Str("listbox"), "integralHeight": Bool(false)),
    semantic!("LBS_MULTICOLUMN" => "role": Str("listbox"), "multicolumn": Bool(true), "scrolling": Str("horizontal")),
    semantic!("LBS_WANTKEYBOARDINPUT" => "role": Str("listbox"), "keyboardInput": Bool(true)),
    semantic!("LBS_EXTENDEDSEL" => "role": Str("listbox"), "selection": Str("extended")),
    semantic!("LBS_DISABLENOSCROLL" => "role": Str("listbox"), "scrolling": Str("always")),
    semantic!("LBS_NOSEL" => "role": Str("listbox"), "selection": Str("none")),
    // List control styles
    semantic!("LVS_ICON" => "role": Str("listctrl"), "view": Str("icon")),
    semantic!("LVS_REPORT" => "role": Str("listctrl"), "view": Str("report")),
    semantic!("LVS_SMALLICON" => "role": Str("listctrl"), "view": Str("smallicon")),
    semantic!("LVS_LIST" => "role": Str("listctrl"), "view": Str("list")),
    semantic!("LVS_SINGLESEL" => "role": Str("listctrl"), "selection": Str("single")),
    semantic!("LVS_SHOWSELALWAYS" => "role": Str("listctrl"), "keepSelection": Bool(true)),
    semantic!("LVS_SORTASCENDING" => "role": Str("listctrl"), "sorted": Str("ascending")),
    semantic!("LVS_SORTDESCENDING" => "role": Str("listctrl"), "sorted": Str("descending")),
    semantic!("LVS_NOCOLUMNHEADER" => "role": Str("listctrl"), "header": Bool(false)),
    semantic!("LVS_NOSORTHEADER" => "role": Str("listctrl"), "sortHeader": Bool(false)),
    semantic!("LVS_EDITLABELS" => "role": Str("listctrl"), "editLabels": Bool(true)),
    semantic!("LVS_OWNERDRAWFIXED" => "role": Str("listctrl"), "ownerdraw": Str("fixed")),
    semantic!("WLVS_ICON" => "role": Str("listctrl"), "view": Str("icon")),
    semantic!("WLVS_REPORT" => "role": Str("listctrl"), "view": Str("report")),
    semantic!("WLVS_LIST" => "role": Str("listctrl"), "view": Str("list")),
    semantic!("WLVS_SINGLESEL" => "role": Str("listctrl"), "selection": Str("single")),
    // Tree control styles
    semantic!("TVS_HASBUTTONS" => "role": Str("tree"), "expandButtons": Bool(true)),
    semantic!("TVS_HASLINES" => "role": Str("tree"), "lines": Bool(true)),
    semantic!("TVS_LINESATROOT" => "role": Str("tree"), "rootLines": Bool(true)),
    semantic!("TVS_EDITLABELS" => "role": Str("tree"), "editLabels": Bool(true)),
    semantic!("TVS_DISABLEDRAGDROP" => "role": Str("tree"), "dragDrop": Bool(false)),
    semantic!("TVS_SHOWSELALWAYS" => "role": Str("tree"), "keepSelection": Bool(true)),
    semantic!("TVS_CHECKBOXES" => "role": Str("tree"), "toggle": Bool(true)),
    semantic!("TVS_TRACKSELECT" => "role": Str("tree"), "hotTracking": Bool(true)),
    semantic!("TVS_SINGLEEXPAND" => "role": Str("tree"), "singleExpand": Bool(true)),
    semantic!("TVS_FULLROWSELECT" => "role": Str("tree"), "selection": Str("fullrow")),
    // Window base styles
    semantic!("WBS_CAPTION" => "role": Str("window"), "caption": Bool(true)),
    semantic!("WBS_CHILD" => "role": Str("window"), "layer": Str("child")),
    semantic!("WBS_POPUP" => "role": Str("window"), "layer": Str("popup")),
    semantic!("WBS_MODAL" => "role": Str("window"), "modal": Bool(true)),
    semantic!("WBS_MOVE" => "role": Str("window"), "movable": Bool(true)),
    semantic!("WBS_TOPMOST" => "role": Str("window"), "layer": Str("topmost")),
    semantic!("WBS_NOFRAME" => "role": Str("window"), "frame": Str("none")),
    semantic!("WBS_THICKFRAME" => "role": Str("window"), "frame": Str("thick"), "resizable": Bool(true)),
    semantic!("WBS_NODRAWFRAME" => "role": Str("window"), "frame": Str("hidden")),
    semantic!("WBS_CHILDFRAME" => "role": Str("window"), "frame": Str("child")),
    semantic!("WBS_VSCROLL" => "role": Str("window"), "scrolling": Str("vertical")),
    semantic!("WBS_HSCROLL" => "role": Str("window"), "scrolling": Str("horizontal")),
    semantic!("WBS_NOFOCUS" => "role": Str("window"), "focusable": Bool(false)),
    semantic!("WBS_KEY" => "role": Str("window"), "keyboardInput": Bool(true)),
    semantic!("WBS_DOCKING" => "role": Str("window"), "docking": Bool(true)),
    semantic!("WBS_MANAGER" => "role": Str("window"), "managed": Bool(true)),
    semantic!("WBS_SOUND" => "role": Str("window"), "sound": Bool(true)),
    semantic!("WBS_HELP" => "role": Str("window"), "titleButton": Str("help")),
    semantic!("WBS_PIN" => "role": Str("window"), "titleButton": Str("pin")),
    semantic!("WBS_VIEW" => "role": Str("window"), "titleButton": Str("view")),
    semantic!("WBS_EXTENSION" => "role": Str("window"), "titleButton": Str("extension")),
    semantic!("WBS_MINIMIZEBOX" => "role": Str("window"), "titleButton": Str("minimize")),
    semantic!("WBS_MAXIMIZEBOX" => "role": Str("window"), "titleButton": Str("maximize")),
    semantic!("WBS_HORI" => "orientation": Str("horizontal")),
    semantic!("WBS_VERT" => "orientation": Str("vertical")),
    semantic!("WBS_NOCENTER" => "role": Str("window"), "centered": Bool(false)),
    semantic!("WBS_NOCLOSE" => "role": Str("window"), "closable": Bool(false)),
    semantic!("WBS_MENUITEM" => "role": Str("menuitem")),
    semantic!("WBS_NOMENUICON" => "role": Str("menuitem"), "icon": Bool(false)),
    semantic!("WBS_PUSHLIKE" => "role": Str("button"), "appearance": Str("pushlike")),
    semantic!("WBS_CHECK" => "role": Str("button"), "kind": Str("checkbox"), "toggle": Bool(true)),
    semantic!("WBS_RADIO" => "role": Str("button"), "kind": Str("radio"), "toggle": Bool(true)),
    semantic!("WBS_HIGHLIGHT" => "highlight": Str("hover")),
    semantic!("WBS_HIGHLIGHTPUSH" => "highlight": Str("pressed")),
    semantic!("WBS_TEXT" => "content": Str("text")),
    semantic!("WBS_SPRITE" => "content": Str("sprite")),
    semantic!("WBS_MONEY" => "content": Str("money"), "input": Str("numeric")),
    semantic!("WBS_OVERRIDE_FIRST" => "overrideFirst": Bool(true)),
];

pub fn lookup(flag: &str) -> Option<&'static SemanticEntry> {
    SEMANTIC_DICTIONARY.iter().find(|entry| entry.flag == flag)
}
