// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use blueprint_rooms_core::{DetectionResult, Error, NormalizedBox, RoomDetector};
use blueprint_rooms_vision::{detect_rooms, ClassicalDetector, DetectionConfig, MODEL_VERSION};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;

const CLASSICAL_SCORES: [f64; 4] = [0.70, 0.80, 0.85, 0.95];

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode test image");
    bytes
}

fn blank(size: u32) -> GrayImage {
    GrayImage::from_pixel(size, size, Luma([255]))
}

/// White page with filled black rectangles, given as `(x, y, w, h)`
fn page_with_blocks(size: u32, blocks: &[(i32, i32, u32, u32)]) -> DynamicImage {
    let mut img = blank(size);
    for &(x, y, w, h) in blocks {
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), Luma([0]));
    }
    DynamicImage::ImageLuma8(img)
}

/// Floor plan drawn as wall lines: a 3x2 grid of rooms inside an outer wall.
/// Positions scale with `size`; walls keep a fixed pixel weight.
fn floor_plan(size: u32) -> DynamicImage {
    const WALL: u32 = 4;
    let mut img = blank(size);
    let scale = size as f64 / 1000.0;
    let mut wall = |x: f64, y: f64, length: f64, horizontal: bool| {
        let at = Rect::at((x * scale).round() as i32, (y * scale).round() as i32);
        let length = (length * scale).round() as u32 + WALL;
        let rect = if horizontal {
            at.of_size(length, WALL)
        } else {
            at.of_size(WALL, length)
        };
        draw_filled_rect_mut(&mut img, rect, Luma([0]));
    };

    // Outer walls
    wall(150.0, 150.0, 700.0, true);
    wall(150.0, 850.0, 700.0, true);
    wall(150.0, 150.0, 700.0, false);
    wall(850.0, 150.0, 700.0, false);
    // Interior walls off-centre so the rooms differ in area
    wall(380.0, 150.0, 700.0, false);
    wall(620.0, 150.0, 700.0, false);
    wall(150.0, 480.0, 700.0, true);

    DynamicImage::ImageLuma8(img)
}

fn boxes_near(a: &NormalizedBox, b: &NormalizedBox, tolerance: u32) -> bool {
    let a: [u32; 4] = (*a).into();
    let b: [u32; 4] = (*b).into();
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

fn assert_box_near(actual: &NormalizedBox, expected: [u32; 4], tolerance: u32) {
    let [x_min, y_min, x_max, y_max] = expected;
    assert!(
        boxes_near(actual, &NormalizedBox::new(x_min, y_min, x_max, y_max), tolerance),
        "box {} not within {} of {:?}",
        actual,
        tolerance,
        expected
    );
}

fn assert_contract(result: &DetectionResult) {
    result.validate().expect("result violates the detector contract");
    assert_eq!(result.model_version, MODEL_VERSION);

    for (index, room) in result.rooms.iter().enumerate() {
        assert_eq!(room.id, format!("room_{:03}", index));
        assert!(room.name_hint.is_none());
        assert!(
            CLASSICAL_SCORES.contains(&room.confidence),
            "unexpected confidence {}",
            room.confidence
        );
    }

    for (i, a) in result.rooms.iter().enumerate() {
        for b in &result.rooms[i + 1..] {
            let iou = a.bounding_box.iou(&b.bounding_box);
            assert!(iou <= 0.3, "{} and {} overlap with IoU {}", a.id, b.id, iou);
        }
    }
}

#[test]
fn test_blank_page_has_no_rooms() {
    let bytes = encode(&DynamicImage::ImageLuma8(blank(1000)), ImageFormat::Png);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert!(result.rooms.is_empty());
    assert_eq!(result.model_version, "phase_1_opencv");
}

#[test]
fn test_single_rectangle_is_one_room() {
    let page = page_with_blocks(1000, &[(300, 300, 200, 200)]);
    let bytes = encode(&page, ImageFormat::Png);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert_contract(&result);
    assert_eq!(result.rooms.len(), 1, "rooms: {:?}", result.rooms);
    let room = &result.rooms[0];
    assert_eq!(room.id, "room_000");
    // The dilated edge band sits a few pixels outside the drawn rectangle
    assert_box_near(&room.bounding_box, [300, 300, 500, 500], 3);
    assert_eq!(room.confidence, 0.95);
}

#[test]
fn test_rooms_ordered_by_area() {
    let page = page_with_blocks(1000, &[(100, 100, 150, 150), (500, 450, 300, 250)]);
    let bytes = encode(&page, ImageFormat::Png);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert_contract(&result);
    assert_eq!(result.rooms.len(), 2, "rooms: {:?}", result.rooms);
    assert_box_near(&result.rooms[0].bounding_box, [500, 450, 800, 700], 6);
    assert_box_near(&result.rooms[1].bounding_box, [100, 100, 250, 250], 6);
}

#[test]
fn test_floor_plan_satisfies_contract() {
    let bytes = encode(&floor_plan(1000), ImageFormat::Png);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert_contract(&result);
    assert!(!result.rooms.is_empty());

    let areas: Vec<u64> = result.rooms.iter().map(|r| r.bounding_box.area()).collect();
    // Normalized areas truncate, so allow a little slack between neighbours
    for pair in areas.windows(2) {
        assert!(
            pair[0] as f64 >= pair[1] as f64 * 0.97,
            "rooms not ordered by area: {:?}",
            areas
        );
    }
}

#[test]
fn test_detection_is_deterministic() {
    let bytes = encode(&floor_plan(800), ImageFormat::Png);
    let detector = ClassicalDetector::default();

    let first = detector.detect(&bytes).unwrap();
    let second = detector.detect(&bytes).unwrap();

    assert_eq!(first.rooms, second.rooms);
    assert_eq!(first.model_version, second.model_version);
}

#[test]
fn test_floor_plan_boxes_independent_of_resolution() {
    let detector = ClassicalDetector::default();
    let small = detector
        .detect(&encode(&floor_plan(500), ImageFormat::Png))
        .unwrap();
    let large = detector
        .detect(&encode(&floor_plan(2000), ImageFormat::Png))
        .unwrap();

    assert_contract(&small);
    assert_contract(&large);
    assert_eq!(small.rooms.len(), 6, "rooms: {:?}", small.rooms);
    assert_eq!(large.rooms.len(), 6, "rooms: {:?}", large.rooms);

    // One pixel at 500 px is two normalized units
    for room in &small.rooms {
        assert!(
            large
                .rooms
                .iter()
                .any(|other| boxes_near(&room.bounding_box, &other.bounding_box, 10)),
            "{} {} has no counterpart at 2000 px: {:?}",
            room.id,
            room.bounding_box,
            large.rooms
        );
    }
}

#[test]
fn test_tiff_input() {
    let page = page_with_blocks(1000, &[(300, 300, 200, 200)]);
    let bytes = encode(&page, ImageFormat::Tiff);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert_contract(&result);
    assert_eq!(result.rooms.len(), 1, "rooms: {:?}", result.rooms);
    assert_box_near(&result.rooms[0].bounding_box, [300, 300, 500, 500], 3);
}

#[test]
fn test_color_jpeg_input() {
    let gray = page_with_blocks(600, &[(150, 150, 250, 200)]).to_luma8();
    let rgb = RgbImage::from_fn(600, 600, |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        image::Rgb([v, v, v])
    });
    let bytes = encode(&DynamicImage::ImageRgb8(rgb), ImageFormat::Jpeg);

    let result = ClassicalDetector::default().detect(&bytes).unwrap();

    assert_contract(&result);
    assert!(!result.rooms.is_empty());
    assert_box_near(&result.rooms[0].bounding_box, [250, 250, 666, 583], 12);
}

#[test]
fn test_min_confidence_filters_rooms() {
    let page = page_with_blocks(1000, &[(300, 300, 200, 200)]);
    let bytes = encode(&page, ImageFormat::Png);
    let config = DetectionConfig {
        min_confidence: Some(0.99),
        ..Default::default()
    };

    let result = detect_rooms(&bytes, &config).unwrap();

    assert!(result.rooms.is_empty());
}

#[test]
fn test_undecodable_input() {
    let detector = ClassicalDetector::default();

    let err = detector.detect(b"\x89PNG\r\n\x1a\n truncated").unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    assert!(err.is_client_error());
}

#[test]
fn test_invalid_config_rejected() {
    let config = DetectionConfig {
        canny_low: 200.0,
        canny_high: 100.0,
        ..Default::default()
    };
    let err = detect_rooms(&[], &config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_result_json_schema() {
    let page = page_with_blocks(1000, &[(300, 300, 200, 200)]);
    let result = ClassicalDetector::default()
        .detect(&encode(&page, ImageFormat::Png))
        .unwrap();

    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["model_version"], "phase_1_opencv");
    assert!(value["processing_time_ms"].is_u64());
    let room = &value["rooms"][0];
    assert_eq!(room["id"], "room_000");
    assert_eq!(room["bounding_box"].as_array().map(|b| b.len()), Some(4));
    assert!(room["name_hint"].is_null());
}
