// SPDX-License-Identifier: MPL-2.0
use cloud_lens::cloud::{ColorScheme, GlyphSource, LayoutOptions};
use cloud_lens::config::{self, Config};
use cloud_lens::domain::{CellValue, ShapeKind, ShapeSpec};
use cloud_lens::error::{Error, ExportError};
use cloud_lens::export::{render_legend, save_composite, ExportOptions};
use cloud_lens::text::Tokenizer;
use cloud_lens::{GenerateRequest, Session};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const WHITE: image_rs::Rgb<u8> = image_rs::Rgb([255, 255, 255]);

fn write_csv(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("comments.csv");
    fs::write(&path, content).expect("Failed to write csv");
    path
}

fn session_for(path: &Path) -> Session {
    let mut session = Session::new(Tokenizer::new(), GlyphSource::bitmap());
    session.load(path).expect("Failed to load table");
    session
}

fn request(column: &str, shape: ShapeSpec) -> GenerateRequest {
    GenerateRequest {
        column: column.to_string(),
        shape,
        color_scheme: ColorScheme::Viridis,
        seed: Some(7),
        layout: LayoutOptions::default(),
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn mixed_script_comments_make_a_square_cloud() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "id,comment\n1,好好好\n2,bad bad\n3,\n");
    let session = session_for(&path);

    let artifact = session
        .generate(&request("comment", ShapeSpec::Square { side: 300 }))
        .expect("Failed to generate cloud");

    assert_eq!(artifact.frequencies.get("bad"), Some(2));
    assert!(artifact
        .frequencies
        .iter()
        .any(|(token, _)| token.contains('好')));
    assert_eq!(artifact.dimensions(), (300, 300));
    assert!(artifact.image.pixels().any(|p| *p != WHITE));
}

#[test]
fn export_places_legend_right_of_cloud() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "id,comment\n1,good service\n2,bad bad\n");
    let session = session_for(&path);
    let artifact = session
        .generate(&request("comment", ShapeSpec::Square { side: 300 }))
        .unwrap();

    let out = dir.path().join("out.png");
    let options = ExportOptions::default();
    save_composite(Some(&artifact), &out, &options, session.glyphs()).expect("Failed to export");

    let legend = render_legend(&artifact, options.legend_top_words, session.glyphs());
    let written = image_rs::open(&out).expect("Failed to reopen export");
    assert_eq!(written.width(), 300 + legend.width());
    assert_eq!(written.height(), 300.max(legend.height()));

    // Encoded into a sibling and renamed, nothing else left behind
    assert_eq!(file_names(dir.path()), vec!["comments.csv", "out.png"]);
}

#[test]
fn jpeg_export_is_readable() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "comment\nalpha beta\nbeta\n");
    let session = session_for(&path);
    let artifact = session
        .generate(&request(
            "comment",
            ShapeSpec::Rectangle {
                width: 200,
                height: 120,
            },
        ))
        .unwrap();

    let out = dir.path().join("cloud.JPEG");
    save_composite(
        Some(&artifact),
        &out,
        &ExportOptions {
            jpeg_quality: 80,
            ..ExportOptions::default()
        },
        session.glyphs(),
    )
    .unwrap();

    let written = image_rs::open(&out).expect("Failed to reopen export");
    assert!(written.width() > 200);
}

#[test]
fn export_failures_write_nothing() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "comment\nword\n");
    let session = session_for(&path);
    let artifact = session
        .generate(&request("comment", ShapeSpec::Square { side: 80 }))
        .unwrap();
    let options = ExportOptions::default();

    assert_eq!(
        save_composite(None, &dir.path().join("out.png"), &options, session.glyphs()),
        Err(Error::Export(ExportError::NoArtifact))
    );
    assert_eq!(
        save_composite(
            Some(&artifact),
            &dir.path().join("out.gif"),
            &options,
            session.glyphs()
        ),
        Err(Error::Export(ExportError::UnsupportedFormat("gif".into())))
    );
    let missing = dir.path().join("missing");
    assert_eq!(
        save_composite(
            Some(&artifact),
            &missing.join("out.png"),
            &options,
            session.glyphs()
        ),
        Err(Error::Export(ExportError::Unwritable(missing)))
    );

    assert_eq!(file_names(dir.path()), vec!["comments.csv"]);
}

#[test]
fn excluded_rows_leave_the_counts_and_come_back_on_reset() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "comment,store\nfast delivery,A\nslow delivery,B\nfast refund,A\n",
    );
    let mut session = session_for(&path);

    let everything = session.frequencies("comment").unwrap();
    assert_eq!(everything.get("delivery"), Some(2));

    session
        .toggle_filter("store", &CellValue::from("A"))
        .unwrap();
    assert_eq!(session.active_rows(), vec![1]);
    let filtered = session.frequencies("comment").unwrap();
    assert_eq!(filtered.get("fast"), None);
    assert_eq!(filtered.get("slow"), Some(1));

    let menu = session.filter_menu("store").unwrap();
    let a = menu.iter().find(|e| e.label == "A").unwrap();
    assert!(!a.included);

    session.reset_filter("store").unwrap();
    assert_eq!(session.active_rows(), vec![0, 1, 2]);
    assert_eq!(session.frequencies("comment").unwrap(), everything);
}

#[test]
fn unknown_column_is_reported_everywhere() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "comment\nword\n");
    let mut session = session_for(&path);
    let missing = Error::InvalidColumn("review".into());

    assert_eq!(
        session.toggle_filter("review", &CellValue::from("x")),
        Err(missing.clone())
    );
    assert_eq!(session.reset_filter("review"), Err(missing.clone()));
    assert_eq!(
        session
            .generate(&request("review", ShapeSpec::Square { side: 50 }))
            .map(|a| a.dimensions()),
        Err(missing)
    );
}

#[test]
fn fully_filtered_table_renders_blank_canvas() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "comment,keep\nhello,no\n");
    let mut session = session_for(&path);
    session
        .toggle_filter("keep", &CellValue::from("no"))
        .unwrap();

    let artifact = session
        .generate(&request("comment", ShapeSpec::Square { side: 64 }))
        .unwrap();
    assert!(artifact.frequencies.is_empty());
    assert!(artifact.image.pixels().all(|p| *p == WHITE));
}

#[test]
fn fixed_seed_reproduces_the_image() {
    let dir = tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "comment\nred green blue\ngreen blue\nblue\nyellow red\n",
    );
    let session = session_for(&path);
    let req = request("comment", ShapeSpec::Circle { radius: 100 });

    let first = session.generate(&req).unwrap();
    let second = session.generate(&req).unwrap();
    assert_eq!(first.image, second.image);
    assert_eq!(first.placed, second.placed);

    assert_eq!(first.dimensions(), (200, 200));
    for (x, y) in [(0, 0), (199, 0), (0, 199), (199, 199)] {
        assert_eq!(*first.image.get_pixel(x, y), WHITE);
    }
}

#[test]
fn config_round_trip_drives_requests() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.cloud.shape = ShapeKind::Circle;
    config.cloud.radius = Some(150);
    config.cloud.color_scheme = Some("magma".into());
    config.text.stopwords = vec!["the".into()];
    config::save_to_path(&config, &config_path).expect("Failed to write config");

    let loaded = config::load_from_path(&config_path).expect("Failed to read config");
    assert_eq!(loaded, config);

    let request = GenerateRequest::from_config("comment", &loaded).unwrap();
    assert_eq!(request.shape, ShapeSpec::Circle { radius: 150 });
    assert_eq!(request.color_scheme, ColorScheme::Magma);
}
