mod common;

use reporte_pdf::{
    CONTENT_BOTTOM, CONTENT_TOP, Composer, DrawCmd, Layout, PAGE_WIDTH, RecordingSurface,
    ReportModel, render_model, slice_plan, truncate_cell,
};

#[test]
fn slice_plan_splits_across_pages() {
    assert_eq!(slice_plan(450.0, 200.0, 200.0), vec![200.0, 200.0, 50.0]);
}

#[test]
fn slice_plan_single_slice_when_it_fits() {
    assert_eq!(slice_plan(120.0, 150.0, 200.0), vec![120.0]);
}

#[test]
fn slice_plan_heights_sum_to_scaled_height() {
    let plan = slice_plan(123.4, 37.9, 101.3);
    let sum: f32 = plan.iter().sum();
    assert!((sum - 123.4).abs() < 1e-3, "plan {plan:?} sums to {sum}");
    assert!(plan.iter().all(|&h| h > 0.0));
}

#[test]
fn sliced_image_reconstructs_source_exactly() {
    common::init_logs();
    let image = common::row_tagged_image(100, 450);

    let (mut composer, _) = Composer::begin(RecordingSurface::new(), common::options("Informe"));
    // 200 mm left on page 1; at 100 mm target width the scaled height is
    // 450 mm, forcing two breaks.
    let start = Layout {
        cursor: CONTENT_BOTTOM - 200.0,
        page_index: 0,
    };
    let end = composer.place_image(start, &image, 100.0);
    assert_eq!(end.page_index, 2);

    let surface = composer.finalize().into_surface();
    let slices: Vec<_> = surface
        .pages()
        .iter()
        .flat_map(|page| common::page_images(page))
        .collect();
    assert_eq!(slices.len(), 3);

    let total_height: f32 = slices.iter().map(|(_, h, _)| h).sum();
    assert!((total_height - 450.0).abs() < 1e-3);

    // Continuation slices start at the top of the content region.
    assert!((slices[1].2 - CONTENT_TOP).abs() < 1e-3);
    assert!((slices[2].2 - CONTENT_TOP).abs() < 1e-3);

    let mut reassembled = Vec::new();
    for (slice, _, _) in &slices {
        assert_eq!(slice.width(), image.width());
        reassembled.extend_from_slice(slice.pixels());
    }
    assert_eq!(reassembled, image.pixels(), "slices must partition the source rows");
}

#[test]
fn narrow_tall_image_slices_without_losing_rows() {
    common::init_logs();
    // 3x71 px at full content width: every slice covers a fractional
    // number of source rows, so the row partition must absorb rounding.
    let image = common::row_tagged_image(3, 71);

    let (mut composer, start) =
        Composer::begin(RecordingSurface::new(), common::options("Informe"));
    composer.place_image(start, &image, 170.0);

    let surface = composer.finalize().into_surface();
    let mut reassembled = Vec::new();
    for page in surface.pages() {
        for (slice, _, _) in common::page_images(page) {
            reassembled.extend_from_slice(slice.pixels());
        }
    }
    assert_eq!(reassembled, image.pixels(), "slices must partition the source rows");
}

#[test]
fn page_tall_chart_starts_on_the_current_page() {
    common::init_logs();
    let model = ReportModel {
        charts: vec![reporte_pdf::Chart {
            title: "Recaudación Mensual".to_string(),
            image: common::row_tagged_image(100, 600),
        }],
        ..Default::default()
    };

    let document =
        render_model(RecordingSurface::new(), &model, common::options("Informe")).unwrap();
    let surface = document.into_surface();
    assert!(surface.pages().len() > 1);

    // The first page carries the title and the first slice, not just the
    // header band.
    let first = &surface.pages()[0];
    assert!(common::page_texts(first).contains(&"Recaudación Mensual"));
    assert!(!common::page_images(first).is_empty());
}

#[test]
fn ensure_space_is_a_no_op_when_content_fits() {
    let (mut composer, start) =
        Composer::begin(RecordingSurface::new(), common::options("Informe"));
    let after = composer.ensure_space(start, 10.0);
    assert_eq!(after, start);
}

#[test]
fn ensure_space_breaks_page_when_content_does_not_fit() {
    let (mut composer, _) = Composer::begin(RecordingSurface::new(), common::options("Informe"));
    let near_bottom = Layout {
        cursor: CONTENT_BOTTOM - 5.0,
        page_index: 0,
    };
    let after = composer.ensure_space(near_bottom, 10.0);
    assert_eq!(after.page_index, 1);
    assert_eq!(after.cursor, CONTENT_TOP);
}

#[test]
fn header_band_repeats_on_every_page() {
    common::init_logs();
    let options = common::options("Informe de Permisos");
    let header_color = options.header_color;

    let document = render_model(
        RecordingSurface::new(),
        &common::table_only_model(60),
        options,
    )
    .unwrap();
    let surface = document.into_surface();
    assert!(surface.pages().len() > 1);

    for page in surface.pages() {
        let band = page.iter().find(|cmd| {
            matches!(cmd, DrawCmd::FillRect { x, y, w, h, color }
                if *x == 0.0 && *y == 0.0 && *w == PAGE_WIDTH && *h == 40.0 && *color == header_color)
        });
        assert!(band.is_some(), "page missing header band");
        assert!(common::page_texts(page).contains(&"Informe de Permisos"));
    }
}

#[test]
fn footer_numbers_every_page_in_order() {
    let document = render_model(
        RecordingSurface::new(),
        &common::table_only_model(60),
        common::options("Informe"),
    )
    .unwrap();
    let surface = document.into_surface();
    let total = surface.pages().len();

    for (i, page) in surface.pages().iter().enumerate() {
        let texts = common::page_texts(page);
        let expected = format!("Página {} de {total}", i + 1);
        assert!(texts.contains(&expected.as_str()), "missing '{expected}'");
        assert!(texts.iter().any(|t| t.starts_with("Generado: ")));
    }
}

#[test]
fn footer_is_omitted_without_timestamp() {
    let mut options = common::options("Informe");
    options.include_timestamp = false;

    let document = render_model(
        RecordingSurface::new(),
        &common::table_only_model(5),
        options,
    )
    .unwrap();
    let surface = document.into_surface();
    for page in surface.pages() {
        assert!(
            common::page_texts(page)
                .iter()
                .all(|t| !t.starts_with("Página") && !t.starts_with("Generado")),
        );
    }
}

#[test]
fn table_header_row_repeats_after_page_break() {
    let document = render_model(
        RecordingSurface::new(),
        &common::table_only_model(60),
        common::options("Informe"),
    )
    .unwrap();
    let surface = document.into_surface();
    assert!(surface.pages().len() > 1);

    for page in surface.pages() {
        let bold = common::bold_texts(page);
        assert!(bold.contains(&"PPU"), "continuation page missing header row");
        assert!(bold.contains(&"Fecha"));
    }
}

#[test]
fn long_cell_text_is_truncated_with_ellipsis() {
    assert_eq!(truncate_cell("exactly twenty chars"), "exactly twenty chars");
    assert_eq!(
        truncate_cell("this cell text is far too long"),
        "this cell text is..."
    );

    let mut model = ReportModel::default();
    let mut table = common::sample_table(1);
    table.rows[0][0] = "ABCDEFGHIJKLMNOPQRSTUVWXY".to_string();
    model.table = Some(table);

    let document =
        render_model(RecordingSurface::new(), &model, common::options("Informe")).unwrap();
    let surface = document.into_surface();
    let texts = common::page_texts(&surface.pages()[0]);
    assert!(texts.contains(&"ABCDEFGHIJKLMNOPQ..."));
    assert!(!texts.contains(&"ABCDEFGHIJKLMNOPQRSTUVWXY"));
}

#[test]
fn kpi_grid_wraps_three_per_row() {
    let model = ReportModel {
        kpis: common::sample_kpis(7),
        ..Default::default()
    };

    let document =
        render_model(RecordingSurface::new(), &model, common::options("Informe")).unwrap();
    let surface = document.into_surface();

    // Card backgrounds are the 25 mm tall fills below the header band.
    let mut rows: Vec<(f32, usize)> = Vec::new();
    for page in surface.pages() {
        for cmd in page {
            if let DrawCmd::FillRect { y, h, .. } = cmd {
                if *h == 25.0 {
                    match rows.iter_mut().find(|(row_y, _)| row_y == y) {
                        Some((_, count)) => *count += 1,
                        None => rows.push((*y, 1)),
                    }
                }
            }
        }
    }

    let counts: Vec<usize> = rows.iter().map(|(_, c)| *c).collect();
    assert_eq!(counts, vec![3, 3, 1]);
}

#[test]
fn twenty_row_report_paginates_to_two_pages() {
    common::init_logs();
    let model = ReportModel {
        kpis: vec![reporte_pdf::Kpi {
            title: "Total".to_string(),
            value: "120".to_string(),
            subtitle: None,
        }],
        table: Some(common::sample_table(20)),
        ..Default::default()
    };

    let document =
        render_model(RecordingSurface::new(), &model, common::options("Informe")).unwrap();
    assert_eq!(document.page_count(), 2);

    let surface = document.into_surface();
    let pages = surface.pages();

    assert!(common::bold_texts(&pages[1]).contains(&"PPU"));
    assert!(common::page_texts(&pages[0]).contains(&"Página 1 de 2"));
    assert!(common::page_texts(&pages[1]).contains(&"Página 2 de 2"));
}
