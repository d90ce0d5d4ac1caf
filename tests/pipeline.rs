//! End-to-end runs of the three binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use extension_scaffold::{IconOptions, IconPipeline, IconSpec, RasterHelper};

const GLYPH_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect width="100" height="100" fill="#000000"/></svg>"##;

fn bin(name: &str) -> PathBuf {
    match name {
        "generate" => PathBuf::from(env!("CARGO_BIN_EXE_generate")),
        "icon" => PathBuf::from(env!("CARGO_BIN_EXE_icon")),
        "raster" => PathBuf::from(env!("CARGO_BIN_EXE_raster")),
        _ => unreachable!(),
    }
}

fn command(name: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(bin(name));
    cmd.args(args)
        .env("SCAFFOLD_ICON_BIN", bin("icon"))
        .env("SCAFFOLD_RASTER_BIN", bin("raster"));
    cmd
}

fn run(name: &str, args: &[&str]) -> Output {
    command(name, args).output().unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn assert_icon(path: &Path) -> image::RgbaImage {
    let img = image::open(path).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (512, 512));
    img
}

// ============================================================================
// icon
// ============================================================================

#[test]
fn icon_without_glyph() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icon.png");

    let output = run("icon", &["#FF0000", "#0000FF", path_str(&out)]);
    // The third argument is an output path only when it starts with '#'.
    assert!(!output.status.success());
    assert!(!out.exists());

    let out = dir.path().join("#icon.png");
    let output = command("icon", &["#FF0000", "#0000FF", "#icon.png"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let img = assert_icon(&out);
    assert!(img.get_pixel(20, 20)[0] > 200);
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert!(!dir.path().join("temp").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Icon generated successfully at"), "{stdout}");
}

#[test]
fn icon_rejects_invalid_colors() {
    let dir = tempfile::tempdir().unwrap();
    let glyph = dir.path().join("glyph.svg");
    fs::write(&glyph, GLYPH_SVG).unwrap();
    let out = dir.path().join("icon.png");

    for (start, end) in [("red", "#0000FF"), ("#FF0000", "#12345"), ("#FF0000", "0000FF")] {
        let output = run("icon", &[start, end, path_str(&glyph), path_str(&out)]);
        assert_eq!(output.status.code(), Some(1), "{start} {end}");
        assert!(!out.exists());
    }

    let output = run("icon", &["#FF0000"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn icon_rejects_bad_glyph_paths() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icon.png");

    let missing = dir.path().join("missing.svg");
    let output = run("icon", &["#FFF", "#000", path_str(&missing), path_str(&out)]);
    assert_eq!(output.status.code(), Some(1));

    let not_svg = dir.path().join("glyph.txt");
    fs::write(&not_svg, GLYPH_SVG).unwrap();
    let output = run("icon", &["#FFF", "#000", path_str(&not_svg), path_str(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not an SVG"));
    assert!(!out.exists());
}

#[test]
fn icon_with_glyph_and_corrupted_glyph() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.svg");
    let bad = dir.path().join("bad.svg");
    fs::write(&good, GLYPH_SVG).unwrap();
    fs::write(&bad, &GLYPH_SVG[..40]).unwrap();

    let good_out = dir.path().join("good/icon.png");
    let output = run("icon", &["#FF0000", "#0000FF", path_str(&good), path_str(&good_out), "EXT"]);
    assert!(output.status.success(), "{output:?}");
    let with_glyph = assert_icon(&good_out);
    // 100x100 at 300dpi is shrunk to the 325px available height, centered
    // in the gradient area.
    assert_eq!(with_glyph.get_pixel(256, 202).0, [255, 255, 255, 255]);
    assert!(!dir.path().join("good/temp").exists());

    let bad_out = dir.path().join("bad/icon.png");
    let output = run("icon", &["#FF0000", "#0000FF", path_str(&bad), path_str(&bad_out)]);
    assert!(output.status.success(), "{output:?}");
    let fallback = assert_icon(&bad_out);
    let center = fallback.get_pixel(256, 202);
    assert_ne!(center.0, [255, 255, 255, 255]);
    assert_eq!(center[3], 255);
    assert!(!dir.path().join("bad/temp").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error processing SVG"));

    // The glyph box starts at x=93; its blurred shadow darkens the gradient
    // just outside it.
    let brightness = |img: &image::RgbaImage, x, y| {
        let px = img.get_pixel(x, y);
        u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2])
    };
    let shadowed = brightness(&with_glyph, 90, 202);
    let plain = brightness(&fallback, 90, 202);
    assert!(shadowed + 15 < plain, "shadow {shadowed} vs plain {plain}");
    assert_eq!(with_glyph.get_pixel(90, 202)[3], 255);
}

#[tokio::test]
async fn pipeline_api_uses_options() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/dir/icon.png");
    let spec = IconSpec::from_options(IconOptions::new("#0F0", "#000").output(&out)).unwrap();

    let written = IconPipeline::new(RasterHelper::new(bin("raster")))
        .generate(&spec)
        .await
        .unwrap();

    assert!(written.is_absolute());
    assert_eq!(written, fs::canonicalize(&out).unwrap());
    assert_icon(&out);
    assert!(!dir.path().join("nested/dir/temp").exists());
}

// ============================================================================
// raster
// ============================================================================

#[test]
fn raster_rejects_unknown_operation_and_arity() {
    let output = run("raster", &["sharpen", "a.png", "b.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown operation: sharpen"));

    let output = run("raster", &["composite", "a.png", "b.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("requires 3 arguments"));

    let output = run("raster", &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn raster_resize_contain() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output_path = dir.path().join("out.png");
    image::RgbaImage::from_pixel(40, 20, image::Rgba([1, 2, 3, 255]))
        .save(&input)
        .unwrap();

    let output = run(
        "raster",
        &["resize", path_str(&input), path_str(&output_path), "30", "30", "contain"],
    );
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Resize complete"));

    let img = image::open(&output_path).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (30, 30));
    assert_eq!(img.get_pixel(15, 0)[3], 0);
}

// ============================================================================
// generate
// ============================================================================

fn scaffold(root: &Path, config: &str) -> (PathBuf, PathBuf) {
    let config_dir = root.join("config");
    let template = root.join("template");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(template.join("src")).unwrap();
    fs::write(config_dir.join("config.json"), config).unwrap();
    fs::write(template.join("greet.txt.ejs"), "Hello <%= title %>").unwrap();
    fs::write(template.join("src/static.bin"), [7u8, 0, 255, 13]).unwrap();
    (config_dir, template)
}

#[test]
fn generate_renders_and_copies() {
    let root = tempfile::tempdir().unwrap();
    let (config_dir, template) = scaffold(root.path(), r#"{"title":"Hello"}"#);
    let out = root.path().join("out");

    let output = run(
        "generate",
        &[path_str(&config_dir), path_str(&template), path_str(&out)],
    );
    assert!(output.status.success(), "{output:?}");

    assert_eq!(fs::read_to_string(out.join("greet.txt")).unwrap(), "Hello Hello");
    assert_eq!(fs::read(out.join("src/static.bin")).unwrap(), vec![7, 0, 255, 13]);
    assert!(!out.join("icon.png").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Skipping icon generation"));
}

#[test]
fn generate_triggers_icon() {
    let root = tempfile::tempdir().unwrap();
    let (config_dir, template) = scaffold(
        root.path(),
        r##"{"title":"Hello","icon":{"background":["#FF5500","#0055FF"]}}"##,
    );
    fs::write(config_dir.join("glyph.svg"), GLYPH_SVG).unwrap();
    let out = root.path().join("out");

    let output = run(
        "generate",
        &[path_str(&config_dir), path_str(&template), path_str(&out)],
    );
    assert!(output.status.success(), "{output:?}");

    assert_icon(&out.join("icon.png"));
    assert!(!out.join("temp").exists());
    assert_eq!(fs::read_to_string(out.join("greet.txt")).unwrap(), "Hello Hello");
}

#[test]
fn generate_icon_failure_keeps_files() {
    let root = tempfile::tempdir().unwrap();
    let (config_dir, template) = scaffold(
        root.path(),
        r##"{"title":"Hello","icon":{"background":["not-a-color","#0055FF"]}}"##,
    );
    fs::write(config_dir.join("glyph.svg"), GLYPH_SVG).unwrap();
    let out = root.path().join("out");

    let output = run(
        "generate",
        &[path_str(&config_dir), path_str(&template), path_str(&out)],
    );
    assert!(output.status.success(), "{output:?}");
    assert!(!out.join("icon.png").exists());
    assert_eq!(fs::read_to_string(out.join("greet.txt")).unwrap(), "Hello Hello");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Icon generation failed"));
}

#[test]
fn generate_fails_without_config() {
    let root = tempfile::tempdir().unwrap();
    let output = run("generate", &[path_str(root.path())]);
    assert_eq!(output.status.code(), Some(1));

    fs::write(root.path().join("config.json"), "{ broken").unwrap();
    let output = run("generate", &[path_str(root.path())]);
    assert_eq!(output.status.code(), Some(1));

    let output = run("generate", &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn generate_is_repeatable() {
    let root = tempfile::tempdir().unwrap();
    let (config_dir, template) = scaffold(root.path(), r#"{"title":"Hello"}"#);
    let first = root.path().join("first");
    let second = root.path().join("second");

    for out in [&first, &second] {
        let output = run("generate", &[path_str(&config_dir), path_str(&template), path_str(out)]);
        assert!(output.status.success());
    }
    for rel in ["greet.txt", "src/static.bin"] {
        assert_eq!(fs::read(first.join(rel)).unwrap(), fs::read(second.join(rel)).unwrap());
    }
}
