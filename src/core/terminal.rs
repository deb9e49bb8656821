use console::{Emoji, style};

pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");

#[allow(dead_code)]
pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

#[allow(dead_code)]
pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_banner() {
    println!();
    println!(" {}", style("plume").magenta().bold());
    println!(" {}", style("article in, scheduled posts out").dim());
    println!();
}
