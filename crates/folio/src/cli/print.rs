use chrono::{DateTime, Utc};
use colored::Colorize;
use folioapp::carousel::{Carousel, CarouselPhase};
use folioapp::commands::{CmdMessage, MessageLevel};
use folioapp::model::{MediaKind, RecordMeta, SectionKey};
use folioapp::surface::CarouselModal;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 7;
const SIZE_WIDTH: usize = 10;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_alerts(alerts: &[String]) {
    for alert in alerts {
        eprintln!("{}", alert.red());
    }
}

/// Rows come grouped by section in page order; positions restart per
/// section and collection, matching `view` and `carousel` arguments.
pub(super) fn print_rows(rows: &[RecordMeta]) {
    if rows.is_empty() {
        println!("No files found.");
        return;
    }

    let mut current: Option<SectionKey> = None;
    let mut positions = (0usize, 0usize);

    for row in rows {
        if current != Some(row.section) {
            if current.is_some() {
                println!();
            }
            println!("{}", format!("Section {}", row.section).bold());
            current = Some(row.section);
            positions = (0, 0);
        }

        let (position, marker) = match row.kind {
            MediaKind::Pdf => {
                positions.0 += 1;
                (positions.0, "pdf")
            }
            MediaKind::Image => {
                positions.1 += 1;
                (positions.1, "img")
            }
        };

        let left = format!("    {} {:>2}. ", marker, position);
        let id = format!("{:>width$}", format!("#{}", row.id), width = ID_WIDTH);
        let size = format!("{:>width$}", format_size(row.size), width = SIZE_WIDTH);
        let time_ago = format_time_ago(row.created_at);

        let fixed = left.width() + ID_WIDTH + SIZE_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let name = truncate_to_width(&row.name, available);
        let padding = available.saturating_sub(name.width());

        let left = match row.kind {
            MediaKind::Pdf => left.normal(),
            MediaKind::Image => left.cyan(),
        };

        println!(
            "{}{}{}{}{}{}",
            left,
            name,
            " ".repeat(padding),
            id.yellow(),
            size.dimmed(),
            time_ago.dimmed()
        );
    }
}

pub(super) struct SectionLine {
    pub section: SectionKey,
    pub documents: usize,
    pub images: usize,
    pub static_images: usize,
}

pub(super) fn print_sections(lines: &[SectionLine]) {
    for line in lines {
        let statics = if line.static_images > 0 {
            format!("  (+{} static)", line.static_images)
                .dimmed()
                .to_string()
        } else {
            String::new()
        };
        println!(
            "  {}  {:>3} documents  {:>3} images{}",
            line.section.as_str().bold(),
            line.documents,
            line.images,
            statics
        );
    }
}

pub(super) fn print_document(name: &str, frame_src: &str, size: usize) {
    println!("{} {}", "Viewing".green(), name.bold());
    println!("  frame:    {}", frame_src);
    println!("  download: {}", frame_src);
    println!("  size:     {}", format_size(size as u64).trim());
}

pub(super) fn print_carousel(modal: &CarouselModal, carousel: &Carousel) {
    let geometry = carousel.geometry();
    let phase = match carousel.phase() {
        CarouselPhase::Closed => "closed",
        CarouselPhase::Running => "running",
        CarouselPhase::Paused => "paused",
    };

    println!(
        "{} {} images, theta {}°, radius {}px, {}",
        "Carousel".green(),
        geometry.count,
        trim_float(geometry.theta),
        trim_float(geometry.radius),
        phase
    );
    println!("  angle: {}°", trim_float(carousel.angle()));
    println!("  ring:  {}", modal.ring_transform);
    for item in &modal.items {
        println!(
            "  {:>3}. {}  {}",
            item.index + 1,
            truncate_to_width(&item.url, 48),
            item.transform.dimmed()
        );
    }
}

fn trim_float(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {} ", bytes, UNITS[0])
    } else {
        format!("{:.1} {} ", value, UNITS[unit])
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short.pdf", 20), "short.pdf");
        assert_eq!(truncate_to_width("a-very-long-name.pdf", 8), "a-very-…");
        assert_eq!(truncate_to_width("日本語の書類.pdf", 7), "日本語…");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B ");
        assert_eq!(format_size(2048), "2.0 KB ");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB ");
    }

    #[test]
    fn floats_print_without_noise() {
        assert_eq!(trim_float(-0.0), "0");
        assert_eq!(trim_float(-0.6000000000000001), "-0.6");
        assert_eq!(trim_float(802.0), "802");
    }
}
