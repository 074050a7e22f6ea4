/// ## Summary
/// Titles for the events of a multi-event schedule: `"{base} 01"`, `"{base} 02"`, ...
///
/// Numbers start at 1 and are zero-padded to the number of digits in `count`.
#[must_use]
pub fn numbered_titles(base: &str, count: usize) -> Vec<String> {
    let width = count.to_string().len();
    (1..=count)
        .map(|i| format!("{base} {i:0width$}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_count_width() {
        let titles = numbered_titles("Lecture", 12);

        assert_eq!(titles.len(), 12);
        assert_eq!(titles[0], "Lecture 01");
        assert_eq!(titles[11], "Lecture 12");
    }

    #[test]
    fn test_single_digit_counts() {
        assert_eq!(numbered_titles("Lab", 3), vec!["Lab 1", "Lab 2", "Lab 3"]);
        assert!(numbered_titles("Lab", 0).is_empty());
    }

    #[test]
    fn test_hundreds() {
        let titles = numbered_titles("Talk", 100);

        assert_eq!(titles[8], "Talk 009");
        assert_eq!(titles[99], "Talk 100");
    }
}
