//! キャプチャ画像（SVG）の描画
//!
//! 文字ごとに色・位置・回転をずらし、ノイズ曲線を重ねる。
//! 機械判読への耐性は目的外。

use rand::Rng;
use std::fmt::Write;

/// 画像の幅
pub const WIDTH: u32 = 150;
/// 画像の高さ
pub const HEIGHT: u32 = 50;
/// 背景色
pub const BACKGROUND: &str = "#f0f0f0";
/// ノイズ曲線の本数
pub const NOISE_LINES: usize = 2;

/// テキストをSVGとして描画
pub fn render_svg<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut svg = String::with_capacity(1024);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0,0,{w},{h}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = write!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        BACKGROUND
    );

    for _ in 0..NOISE_LINES {
        push_noise_line(&mut svg, rng);
    }

    let count = text.chars().count().max(1) as f64;
    let slot = f64::from(WIDTH) / (count + 1.0);

    for (i, ch) in text.chars().enumerate() {
        let x = slot * (i as f64 + 1.0) + rng.gen_range(-4.0..4.0);
        let y = f64::from(HEIGHT) * 0.7 + rng.gen_range(-5.0..5.0);
        let angle = rng.gen_range(-30.0..30.0);
        let size = rng.gen_range(28..38);
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="{size}" font-family="monospace" text-anchor="middle" fill="{color}" transform="rotate({angle:.1} {x:.1} {y:.1})">{ch}</text>"#,
            color = random_color(rng),
        );
    }

    svg.push_str("</svg>");
    svg
}

fn push_noise_line<R: Rng + ?Sized>(svg: &mut String, rng: &mut R) {
    let w = f64::from(WIDTH);
    let h = f64::from(HEIGHT);
    let start = (rng.gen_range(1.0..21.0), rng.gen_range(1.0..h - 1.0));
    let end = (rng.gen_range(w - 21.0..w - 1.0), rng.gen_range(1.0..h - 1.0));
    let c1 = (rng.gen_range(w / 4.0..w / 2.0), rng.gen_range(1.0..h - 1.0));
    let c2 = (rng.gen_range(w / 2.0..w * 0.75), rng.gen_range(1.0..h - 1.0));

    let _ = write!(
        svg,
        r#"<path d="M{:.1} {:.1} C{:.1} {:.1},{:.1} {:.1},{:.1} {:.1}" stroke="{}" stroke-width="{}" fill="none"/>"#,
        start.0,
        start.1,
        c1.0,
        c1.1,
        c2.0,
        c2.1,
        end.0,
        end.1,
        random_color(rng),
        rng.gen_range(1..3),
    );
}

/// 背景より十分暗い色
fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hue = rng.gen_range(0..360);
    let saturation = rng.gen_range(40..90);
    let lightness = rng.gen_range(20..50);
    format!("hsl({hue},{saturation}%,{lightness}%)")
}
