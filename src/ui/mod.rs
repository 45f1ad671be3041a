pub mod widget;

pub use widget::MapControlWidget;
