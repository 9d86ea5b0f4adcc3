use detector::{classify, BarWindow};
use proptest::prelude::*;

proptest! {
    /// The window never grows past capacity and always holds the last
    /// `capacity` pushes in push order.
    #[test]
    fn window_keeps_last_capacity_pushes(
        capacity in 2usize..16,
        pushes in prop::collection::vec(-1.0e9f64..1.0e9f64, 0..64),
    ) {
        let mut window = BarWindow::new(capacity);
        for &price in &pushes {
            window.push(price);
        }

        prop_assert_eq!(window.len(), pushes.len().min(capacity));

        let start = pushes.len().saturating_sub(capacity);
        prop_assert_eq!(window.snapshot(), pushes[start..].to_vec());
    }

    /// Classification never panics and reports a coherent result on
    /// arbitrary finite price sequences.
    #[test]
    fn classify_is_total_and_coherent(
        threshold in 1usize..8,
        pushes in prop::collection::vec(-1.0e9f64..1.0e9f64, 0..32),
    ) {
        let mut window = BarWindow::new(threshold + 1);
        for &price in &pushes {
            window.push(price);
        }

        let result = classify(&window, threshold);
        match result.trend {
            Some(_) => prop_assert!(result.run_length >= threshold),
            None => prop_assert_eq!(result.run_length, 0),
        }

        // Pure function: same window, same answer
        prop_assert_eq!(classify(&window, threshold), result);
    }
}
