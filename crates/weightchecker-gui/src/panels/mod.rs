/// Modal-style dialog panels shared by the main window and sub-windows.

pub mod dialogs;
