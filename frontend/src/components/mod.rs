pub mod achievement_dialog;
pub mod achievement_table;
pub mod achievement_toolbar;
pub mod alert;
pub mod confirm_dialog;
pub mod loading;
pub mod modal;
pub mod pagination;
pub mod progress_bar;
pub mod select_input;
pub mod todo_list;
