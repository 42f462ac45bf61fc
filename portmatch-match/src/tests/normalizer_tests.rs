use super::*;

#[test]
fn lowercases_and_strips_punctuation() {
    assert_eq!(normalize("Celeste"), "celeste");
    assert_eq!(normalize("Shovel Knight: Treasure Trove"), "shovel knight treasure trove");
    assert_eq!(normalize("Half-Life 2"), "half life 2");
    assert_eq!(normalize("OneShot (World Machine Edition)"), "oneshot world machine edition");
}

#[test]
fn removes_standalone_stopwords_only() {
    assert_eq!(normalize("The Binding of Isaac"), "binding isaac");
    assert_eq!(normalize("Ori and the Blind Forest"), "ori blind forest");
    // "Theme" and "Anthem" contain stopwords but are not stopwords
    assert_eq!(normalize("Theme Hospital"), "theme hospital");
    assert_eq!(normalize("Anthem"), "anthem");
}

#[test]
fn ampersand_is_dropped() {
    assert_eq!(normalize("Ratchet & Clank"), "ratchet clank");
    assert_eq!(normalize("Ratchet&Clank"), "ratchet clank");
}

#[test]
fn collapses_whitespace() {
    assert_eq!(normalize("  Stardew \t Valley \n"), "stardew valley");
}

#[test]
fn underscore_counts_as_punctuation() {
    assert_eq!(normalize("hollow_knight"), "hollow knight");
}

#[test]
fn keeps_non_ascii_letters() {
    assert_eq!(normalize("Pokémon Ω"), "pokémon ω");
    assert_eq!(normalize("ÖLAND"), "öland");
}

#[test]
fn empty_and_signal_free_inputs() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("   "), "");
    assert_eq!(normalize("!!! ???"), "");
    assert_eq!(normalize("The A An"), "");
}

#[test]
fn idempotent_on_samples() {
    let samples = [
        "The Witcher 3: Wild Hunt",
        "A Short Hike",
        "DOOM (1993)",
        "Tom & Jerry in: The Movie!",
        "  mixed   CASE  and__under_scores ",
        "Ünïcödé — Dash",
        "",
    ];
    for s in samples {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {s:?}");
    }
}

#[test]
fn output_has_no_uppercase_or_punctuation() {
    let samples = ["Hello, World!", "FTL: Faster Than Light", "S.T.A.L.K.E.R.", "Baba_Is_You"];
    for s in samples {
        let out = normalize(s);
        assert!(
            out.chars().all(|c| !c.is_uppercase() && (c.is_alphanumeric() || c == ' ')),
            "unexpected characters in {out:?}"
        );
    }
}

#[test]
fn strip_whitespace_keeps_punctuation() {
    assert_eq!(strip_whitespace("A Short Hike"), "ashorthike");
    assert_eq!(strip_whitespace("Hike!"), "hike!");
    assert_eq!(strip_whitespace(" \t "), "");
}

#[test]
fn uppercase_without_lowercase_form_is_dropped() {
    assert_eq!(normalize("\u{2102}eleste"), "eleste");
    assert_eq!(normalize("Math \u{1D400} Bold"), "math bold");
    assert!(!normalize("\u{3D2}psilon").chars().any(char::is_uppercase));
}
