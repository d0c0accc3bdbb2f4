/// Steps through a fixed list of options with Left/Right, wrapping at both ends.
pub fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let Some(pos) = options.iter().position(|o| *o == current) else {
        return options.first().copied().unwrap_or(current);
    };
    let len = options.len();
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    options[next]
}

/// `< label >` as shown in the form.
pub fn display(label: &str, focused: bool) -> String {
    if focused {
        format!("< {} >", label)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricingMode;

    #[test]
    fn cycles_forward_and_back_with_wrap() {
        let all = PricingMode::ALL;
        assert_eq!(cycle(all, PricingMode::ByHour, true), PricingMode::ByPeople);
        assert_eq!(cycle(all, PricingMode::FixedPrice, true), PricingMode::ByHour);
        assert_eq!(cycle(all, PricingMode::ByHour, false), PricingMode::FixedPrice);
    }
}
