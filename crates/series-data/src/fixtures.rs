//! Column-accurate server log lines for tests.

pub const PREAMBLE: [&str; 5] = [
    "------------------------------------------------------------",
    "Server listening on UDP port 5001",
    "Receiving 1470 byte datagrams",
    "UDP buffer size:  208 KByte (default)",
    "------------------------------------------------------------",
];

/// Connection line carrying a session ID and the peer address at column 46.
pub fn setup_line(id: u32, address: &str) -> String {
    format!(
        "[{:>3}] local 10.0.1.1 port 5001 connected with {} port 38254",
        id, address
    )
}

pub fn header_line() -> String {
    "[ ID] Interval       Transfer     Bandwidth        Jitter   Lost/Total Datagrams"
        .to_string()
}

/// Per-second line for `second..second+1` with `value` in columns 19..26.
pub fn data_line(id: u32, second: usize, value: &str) -> String {
    format!(
        "[{:>3}] {:>4}-{:>4} sec {:>6} KBytes  1.00 Mbits/sec   0.012 ms    0/   85 (0%)",
        id,
        format!("{:.1}", second as f64),
        format!("{:.1}", (second + 1) as f64),
        value
    )
}

/// Whole-session line with `value` (coarse unit) in columns 19..26.
pub fn summary_line(id: u32, value: &str) -> String {
    format!(
        "[{:>3}]  0.0-10.0 sec {:>6} MBytes  1.05 Mbits/sec   0.019 ms    0/  893 (0%)",
        id, value
    )
}

pub fn out_of_order_line(id: u32) -> String {
    format!("[{:>3}] WARNING: 1 datagrams received out-of-order", id)
}

/// A full log: the fixed preamble followed by `lines`, newline-terminated.
pub fn log(lines: &[String]) -> String {
    PREAMBLE
        .iter()
        .map(|l| l.to_string())
        .chain(lines.iter().cloned())
        .map(|l| l + "\n")
        .collect()
}

/// A log with one session of `values` on `address`, ended by a blank line.
pub fn session_log(id: u32, address: &str, values: &[&str]) -> String {
    let mut lines = vec![setup_line(id, address), header_line()];
    lines.extend(
        values
            .iter()
            .enumerate()
            .map(|(second, value)| data_line(id, second, value)),
    );
    lines.push(String::new());
    log(&lines)
}
