pub mod card;
pub mod charts;
pub mod form;
pub mod money;
pub mod pager;
pub mod tabs;
pub mod toast;
