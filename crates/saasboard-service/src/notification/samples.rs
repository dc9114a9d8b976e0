//! Sample notifications for the development mock endpoint.

/// `(title, message)` pairs.
const SAMPLES: &[(&str, &str)] = &[
    ("New Signup", "A new customer just signed up for the Pro plan"),
    ("Payment Received", "Payment of $299 received from CloudSync Pro"),
    ("Churn Alert", "DataNest hasn't logged in for 30 days"),
    ("Support Ticket", "New high-priority ticket from ByteForge"),
    ("Goal Achieved", "Monthly revenue target exceeded by 12%"),
    ("Team Update", "A new team member has been invited"),
    ("System Alert", "API response times are elevated"),
    ("Review Pending", "Quarterly report is ready for your review"),
];

/// Picks one sample at random.
pub(crate) fn pick() -> (&'static str, &'static str) {
    SAMPLES[rand::random_range(0..SAMPLES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_returns_a_known_sample() {
        for _ in 0..32 {
            assert!(SAMPLES.contains(&pick()));
        }
    }

    #[test]
    fn test_pick_varies() {
        let seen: std::collections::HashSet<_> = (0..200).map(|_| pick().0).collect();
        assert!(seen.len() > 1);
    }
}
