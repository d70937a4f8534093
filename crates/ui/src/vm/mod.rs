mod palette_vm;
mod question_vm;
mod screen_vm;
mod summary_vm;
mod time_fmt;

pub use palette_vm::{LEGEND, PaletteTileVm, PaletteTone, map_palette};
pub use question_vm::{OptionVm, QuestionVm};
pub use screen_vm::{LOADING_NOTICE, ScreenVm, WelcomeVm, screen_from_snapshot, screen_from_view};
pub use summary_vm::{SummaryVm, grade_label};
pub use time_fmt::{format_countdown, format_datetime};
