/// Levenshtein edit distance between two strings
///
/// Character-level and case-sensitive. Uses two rolling rows sized to `s0`,
/// one pass per character of `s1`.
///
/// # Examples
///
/// ```
/// use course_triage::xid::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(s0: &str, s1: &str) -> usize {
    let s0: Vec<char> = s0.chars().collect();
    let len0 = s0.len() + 1;

    let mut cost: Vec<usize> = (0..len0).collect();
    let mut new_cost = vec![0; len0];

    for (j, c1) in s1.chars().enumerate() {
        new_cost[0] = j + 1;

        for i in 1..len0 {
            let substitution = cost[i - 1] + usize::from(s0[i - 1] != c1);
            let insertion = cost[i] + 1;
            let deletion = new_cost[i - 1] + 1;
            new_cost[i] = substitution.min(insertion).min(deletion);
        }

        std::mem::swap(&mut cost, &mut new_cost);
    }

    cost[len0 - 1]
}
