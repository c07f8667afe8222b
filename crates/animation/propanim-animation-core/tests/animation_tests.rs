use approx::assert_relative_eq;
use propanim_animation_core::{
    Animation, AnimationError, Blend, Color, KeyframeType, Locale, Property, Rect,
};

const FPS: f64 = 25.0;
const C: Locale = Locale::C;

fn mk(text: &str) -> Animation {
    Animation::parse(text, 0, FPS, C)
}

fn int_at(a: &Animation, position: i64) -> i32 {
    a.get_item(position)
        .map(|item| item.value.get_int(FPS, C))
        .expect("animation has keyframes")
}

fn assert_rect(r: Rect, x: f64, w: f64, o: f64) {
    assert_relative_eq!(r.x, x, epsilon = 1e-9);
    assert_relative_eq!(r.y, x, epsilon = 1e-9);
    assert_relative_eq!(r.w, w, epsilon = 1e-9);
    assert_relative_eq!(r.h, w, epsilon = 1e-9);
    assert_relative_eq!(r.o, o, epsilon = 1e-9);
}

#[test]
fn removing_keys_reinterpolates() {
    let mut a = mk("50=100;60=60;100=0");
    assert!(a.remove(60));
    assert_eq!(a.serialize(), "50=100;100=0");
    let item = a.get_item(75).unwrap();
    assert!(!item.is_key);
    assert_eq!(item.value.get_int(FPS, C), 50);

    let mut a = mk("50=100;60=60;100=0");
    assert!(a.remove(50));
    assert_eq!(a.serialize(), "60=60;100=0");
    assert_eq!(int_at(&a, 80), 30);

    let mut a = mk("50=100;60=60;100=0");
    assert!(a.remove(100));
    assert_eq!(int_at(&a, 55), 80);
}

#[test]
fn serialize_cut_uses_length() {
    let mut a = mk("50=100;60=60;100=0");
    a.set_length(60);
    assert_eq!(a.serialize_cut(-1, -1), "50=100;60=60");
    assert_eq!(a.serialize(), "50=100;60=60;100=0");
}

#[test]
fn serialize_cut_seeds_and_crops() {
    let a = mk("50=100;60=60;100=0");
    assert_eq!(a.serialize_cut(55, 80), "0=80;5=60;25=30");
    assert_eq!(a.serialize_cut(0, 100), "50=100;60=60;100=0");
    assert_eq!(Animation::default().serialize_cut(-1, -1), "");
}

#[test]
fn smooth_integer_sequence() {
    let a = mk("0=80;10~=80;20~=30;30~=40;40~=28;50=90;60=0;70=60;80=20");
    let expected = [
        (10, 80),
        (15, 54),
        (50, 90),
        (55, 45),
        (60, 0),
        (75, 40),
        (100, 20),
    ];
    for (position, value) in expected {
        assert_eq!(int_at(&a, position), value, "at {position}");
    }
    assert!(a.get_item(40).unwrap().is_key);
    assert!(!a.get_item(100).unwrap().is_key);
}

#[test]
fn smooth_rect_matches_reference() {
    let mut p = Property::new("0~=0/0:200x200:0; 50=100/100:400x400:1");
    assert_rect(p.anim_get_rect(FPS, C, 15, 0), 25.8, 251.6, 0.258);
    assert_eq!(
        p.value().get_string(C),
        Some("0~=0 0 200 200 0;50=100 100 400 400 1")
    );
}

#[test]
fn linear_rect_matches_reference() {
    let mut p = Property::new("0=0/0:200x200:0; 50=100/100:400x400:1");
    assert_rect(p.anim_get_rect(FPS, C, 25, 0), 50.0, 300.0, 0.5);
    assert_rect(p.anim_get_rect(FPS, C, 15, 0), 30.0, 260.0, 0.3);
}

#[test]
fn colors_interpolate_per_channel() {
    let mut p = Property::new("0=#ff000000;10=#ffff0000");
    assert_eq!(p.anim_get_color(FPS, C, 5, 0), Color::new(128, 0, 0, 255));
    assert_eq!(p.anim_get_color(FPS, C, 10, 0), Color::new(255, 0, 0, 255));

    let a = mk("0=black;10=red");
    let mid = a.get_item_as(5, Blend::Color).unwrap().value.get_color();
    assert_eq!(mid, Color::new(128, 0, 0, 255));
}

#[test]
fn quoted_string_keyframes() {
    let a = mk("50=hello world; 60=\"good; night\"; 100=bar");
    assert_eq!(a.serialize(), "50=hello world;60=\"good; night\";100=bar");
    assert_eq!(a.key_get(1).unwrap().value.get_string(C), Some("good; night"));

    let before = a.get_item(10).unwrap();
    assert_eq!(before.value.get_string(C), Some("hello world"));
    assert!(!before.is_key);
    assert!(a.get_item(50).unwrap().is_key);
    assert_eq!(
        a.get_item(55).unwrap().value.get_string(C),
        Some("hello world")
    );
    assert_eq!(a.get_item(110).unwrap().value.get_string(C), Some("bar"));
}

#[test]
fn padded_values_are_trimmed() {
    let mut a = mk("0=0; 10 = 10");
    assert_eq!(a.key_get(1).unwrap().value.get_string(C), Some("10"));
    a.insert(5, "5", KeyframeType::Linear);
    assert_eq!(a.serialize(), "0=0;5=5;10=10");
    let quoted = mk("0=\" padded \"");
    assert_eq!(quoted.key_get(0).unwrap().value.get_string(C), Some(" padded "));
}

#[test]
fn embedded_quotes_are_doubled() {
    let mut a = Animation::new(FPS, C);
    a.insert(0, "say \"hi\"", KeyframeType::Discrete);
    assert_eq!(a.serialize(), "0|=\"say \"\"hi\"\"\"");
    let b = mk(&a.serialize());
    assert_eq!(b.key_get(0).unwrap().value.get_string(C), Some("say \"hi\""));
}

#[test]
fn negative_positions_count_from_length() {
    let a = Animation::parse("0=100; -1=200", 100, FPS, C);
    assert_eq!(a.keyframes()[1].frame, 99);
    assert_eq!(int_at(&a, 75), 175);

    let a = Animation::parse("0=100; -1:=200", 125, FPS, C);
    assert_eq!(a.keyframes()[1].frame, 100);
    assert_eq!(int_at(&a, 75), 175);
}

#[test]
fn negative_position_without_length_uses_last_key() {
    let a = mk("0=0;100=100;-10=50");
    let frames: Vec<_> = a.keyframes().iter().map(|k| k.frame).collect();
    assert_eq!(frames, vec![0, 90, 100]);
}

#[test]
fn locale_decimal_comma() {
    let de = Locale::from_name("de_DE");
    let mut a = Animation::parse("0=0,5;10=1,5", 0, FPS, de);
    let mid = a.get_item(5).unwrap().value.get_double(FPS, de);
    assert_relative_eq!(mid, 1.0);
    a.insert(20, 2.25, KeyframeType::Linear);
    assert_eq!(a.serialize(), "0=0,5;10=1,5;20=2,25");
}

#[test]
fn key_editing() {
    let mut a = mk("0=0;10=10;20=20");
    a.key_set_type(1, KeyframeType::Discrete).unwrap();
    assert_eq!(int_at(&a, 15), 10);
    a.shift_frames(5);
    assert_eq!(a.serialize(), "5=0;15|=10;25=20");
    a.key_set_frame(2, 0).unwrap();
    assert_eq!(a.serialize(), "0=20;5=0;15|=10");
    assert_eq!(
        a.key_set_frame(5, 1),
        Err(AnimationError::KeyIndexOutOfRange { index: 5, count: 3 })
    );
    a.clear();
    assert_eq!(a.key_count(), 0);
    assert!(a.get_item(0).is_none());
}

#[test]
fn display_matches_serialize() {
    let a = mk("0=1;10~=2");
    assert_eq!(a.to_string(), a.serialize());
}

#[test]
fn strict_parse_rejects_bad_positions() {
    let err = Animation::try_parse("0=1;x=2", 0, FPS, C).unwrap_err();
    assert_eq!(err.category(), "animation");
    assert!(Animation::try_parse("0=1;1:=2", 0, FPS, C).is_ok());
}
