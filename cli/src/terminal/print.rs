use colored::*;
use sweepr_common::scan::report::ScanStatus;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};

pub const TOTAL_WIDTH: usize = 64;
/// Events under this target are printed verbatim, without a level prefix.
pub const PRINT_TARGET: &str = "sweepr::print";

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn lines<S: AsRef<str>>(lines: &[S]) {
    for line in lines {
        print(line.as_ref());
    }
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }

    let text_content: String = format!("⟦ SWEEPR v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();
    let output: String = format!("{}{}{}", sep, text, sep);

    print(&output);
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

pub fn scan_summary(status: &ScanStatus, open: usize, elapsed_secs: f64, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let open_ports: ColoredString = format!("{open} open ports").bold().color(colors::PRIMARY);
    let total_time: ColoredString = format!("{elapsed_secs:.2}s").bold().yellow();
    let verdict: &str = format::verdict(status);
    let output: ColoredString =
        format!("{verdict}: {open_ports} identified in {total_time}").color(colors::TEXT_DEFAULT);

    fat_separator();
    centerln(&output.to_string());
}

const NO_RESULTS_0: &str = r#"
                       _  _    ___  _  _                 
                      | || |  / _ \| || |                
                      | || |_| | | | || |_               
                      |__   _| |_| |__   _|              
         _   _  ___ _____|_|__\___/__ |_|  _ _   _ ____  
        | \ | |/ _ \_   _| |  ___/ _ \| | | | \ | |  _ \ 
        |  \| | | | || |   | |_ | | | | | | |  \| | | | |
        | |\  | |_| || |   |  _|| |_| | |_| | |\  | |_| |
        |_| \_|\___/ |_|   |_|   \___/ \___/|_| \_|____/ 
"#;

pub fn no_results(q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&format!("{}", NO_RESULTS_0.red().bold()));
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}
