use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::config::Schedule;
use crate::pipeline::RunSummary;

/// Read current process memory usage from /proc/self/status
/// Returns (VmRSS in MB, VmHWM in MB) or None if unable to read
pub fn get_process_memory_mb() -> Option<(f64, f64)> {
    let file = File::open("/proc/self/status").ok()?;
    let reader = BufReader::new(file);

    let mut vm_rss_kb = None;
    let mut vm_hwm_kb = None;

    for line in reader.lines().map_while(Result::ok) {
        // Format: "VmRSS:     12345 kB"
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            vm_rss_kb = rest.split_whitespace().next().and_then(|v| v.parse::<f64>().ok());
        } else if let Some(rest) = line.strip_prefix("VmHWM:") {
            vm_hwm_kb = rest.split_whitespace().next().and_then(|v| v.parse::<f64>().ok());
        }

        if vm_rss_kb.is_some() && vm_hwm_kb.is_some() {
            break;
        }
    }

    Some((vm_rss_kb? / 1024.0, vm_hwm_kb? / 1024.0))
}

/// Format an integer with `,` between groups of three digits.
pub fn group_digits(n: u64) -> String {
    let mut itoa_buf = itoa::Buffer::new();
    let digits = itoa_buf.format(n).as_bytes();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(d as char);
    }
    out
}

fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1e9 {
        format!("{:.2}G", per_sec / 1e9)
    } else if per_sec >= 1e6 {
        format!("{:.2}M", per_sec / 1e6)
    } else if per_sec >= 1e3 {
        format!("{:.2}K", per_sec / 1e3)
    } else {
        format!("{:.0}", per_sec)
    }
}

fn schedule_name(schedule: Schedule) -> &'static str {
    match schedule {
        Schedule::Static => "static",
        Schedule::Dynamic => "dynamic",
    }
}

/// Render the end-of-run report.
///
/// `verbose` adds one line per worker.
pub fn render(summary: &RunSummary, verbose: bool) -> String {
    let config = &summary.config;
    let mut lines = vec![
        String::new(),
        format!(
            "=== Segment Size: {} (bitpacked + isqrt) ===",
            group_digits(config.segment_size as u64)
        ),
        format!("Started: {}", summary.started_at.format("%Y-%m-%d %H:%M:%S")),
        format!(
            "Bound: {} | Workers: {} | Schedule: {} | Wheel: {}",
            group_digits(config.bound),
            config.worker_count,
            schedule_name(config.schedule),
            if config.wheel { "on" } else { "off" }
        ),
        format!(
            "Base primes: {} (up to {})",
            group_digits(summary.base_prime_count as u64),
            group_digits(summary.sqrt_limit)
        ),
    ];

    if verbose {
        for tally in &summary.tallies {
            let span = match &tally.range {
                Some(range) if range.is_empty() => "[empty]".to_string(),
                Some(range) => format!(
                    "[{}, {}]",
                    group_digits(*range.start()),
                    group_digits(*range.end())
                ),
                None => "[shared queue]".to_string(),
            };
            lines.push(format!(
                "  Worker {:>3}: {} {} segments, {} primes, {:.2}s",
                tally.worker_id,
                span,
                group_digits(tally.segments),
                group_digits(tally.primes),
                tally.elapsed.as_secs_f64()
            ));
        }
    }

    lines.push(format!("\u{23F1} Time: {:.2}s", summary.elapsed.as_secs_f64()));
    lines.push(format!("\u{2705} Primes Found: {}", group_digits(summary.total)));
    lines.push(format!(
        "\u{26A1} Throughput: {} integers/s",
        format_rate(summary.throughput())
    ));

    if let (Some((percent, diff)), Some(reference)) =
        (summary.accuracy(), config.reference_count)
    {
        lines.push(format!("\u{1F4CA} Accuracy: {:.6}%", percent));
        lines.push(format!("   (Reference count: {})", group_digits(reference)));
        lines.push(format!("   (Difference: {} primes)", group_digits(diff)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn print(summary: &RunSummary, verbose: bool) {
    print!("{}", render(summary, verbose));

    if let Some((rss_mb, peak_mb)) = get_process_memory_mb() {
        println!("Memory: {:.1}MB resident ({:.1}MB peak)", rss_mb, peak_mb);
    }
}
