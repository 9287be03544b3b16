//! Column-address codec round-trip tests

use scoregen::column::{index_to_letter, letter_to_index};

#[test]
fn test_index_round_trip_through_zz_zz() {
    // 18278 = last three-letter column "ZZZ"
    for index in 1..=18278u32 {
        let letters = index_to_letter(index);
        assert!(!letters.is_empty());
        assert_eq!(
            letter_to_index(&letters),
            index,
            "index {index} via '{letters}'"
        );
    }
}

#[test]
fn test_letter_round_trip_for_all_short_addresses() {
    let alphabet: Vec<char> = ('A'..='Z').collect();
    let mut addresses: Vec<String> = Vec::new();
    for &a in &alphabet {
        addresses.push(a.to_string());
        for &b in &alphabet {
            addresses.push(format!("{a}{b}"));
            for &c in &alphabet {
                addresses.push(format!("{a}{b}{c}"));
            }
        }
    }
    assert_eq!(addresses.len(), 18278);

    for address in addresses {
        let index = letter_to_index(&address);
        assert!(index > 0);
        assert_eq!(index_to_letter(index), address);
    }
}

#[test]
fn test_known_fixed_points() {
    assert_eq!(letter_to_index("A"), 1);
    assert_eq!(letter_to_index("AB"), 28);
    assert_eq!(index_to_letter(28), "AB");
    assert_eq!(letter_to_index("ZZZ"), 18278);
    assert_eq!(index_to_letter(18278), "ZZZ");
}
