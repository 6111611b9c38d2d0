use super::PlatformTicks;
use crate::system::{CoreTicks, SourceError};

pub struct Platform;

impl PlatformTicks for Platform {
    fn read_core_ticks() -> Result<Vec<CoreTicks>, SourceError> {
        let contents = std::fs::read_to_string("/proc/stat")
            .map_err(|e| SourceError::new("cpu_ticks", e.to_string()))?;
        parse_stat(&contents)
    }
}

fn parse_stat(contents: &str) -> Result<Vec<CoreTicks>, SourceError> {
    let mut cores = Vec::new();
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else { continue };
        // Per-core lines are "cpuN ..."; the plain "cpu" line is the
        // aggregate and is skipped.
        if label == "cpu" || !label.starts_with("cpu") {
            continue;
        }
        // user nice system idle iowait irq softirq steal [guest guest_nice]
        let mut values = [0u64; 8];
        for (slot, token) in values.iter_mut().zip(&mut fields) {
            *slot = token.parse().unwrap_or(0);
        }
        cores.push(CoreTicks {
            user: values[0],
            nice: values[1],
            system: values[2],
            idle: values[3],
            iowait: values[4],
            irq: values[5],
            softirq: values[6],
            steal: values[7],
        });
    }
    if cores.is_empty() {
        return Err(SourceError::new("cpu_ticks", "no cpu lines in /proc/stat"));
    }
    Ok(cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  100 2 30 800 10 0 5 0 0 0
cpu0 60 1 20 400 5 0 3 0 0 0
cpu1 40 1 10 400 5 0 2 0 0 0
intr 12345
ctxt 6789
";

    #[test]
    fn parses_per_core_lines_only() {
        let cores = parse_stat(STAT).unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].user, 60);
        assert_eq!(cores[0].idle, 400);
        assert_eq!(cores[1].user, 40);
        assert_eq!(cores[1].softirq, 2);
    }

    #[test]
    fn missing_trailing_fields_default_to_zero() {
        let cores = parse_stat("cpu0 10 0 5 100\n").unwrap();
        assert_eq!(cores[0].iowait, 0);
        assert_eq!(cores[0].steal, 0);
        assert_eq!(cores[0].total(), 115);
    }

    #[test]
    fn no_cpu_lines_is_an_error() {
        assert!(parse_stat("intr 1\nctxt 2\n").is_err());
    }
}
