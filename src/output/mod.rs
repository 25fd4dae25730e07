// Output formatting — terminal display of the ranked report.

pub mod terminal;
