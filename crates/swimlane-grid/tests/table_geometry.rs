use proptest::prelude::*;
use swimlane_core::Coord;
use swimlane_grid::{Area, CellSpec, Grid, GridError, GridSource, TableLayout};

fn c(row: u32, col: u32) -> Coord {
    Coord::new(row, col)
}

/// The quickstart board: a two-row header band over two lanes.
fn banded() -> TableLayout {
    TableLayout::new()
        .row(vec![
            CellSpec::header().rowspan(2),
            CellSpec::header().rowspan(2),
            CellSpec::header().colspan(2),
            CellSpec::header().rowspan(2),
        ])
        .row(vec![CellSpec::header(), CellSpec::header()])
        .row(vec![
            CellSpec::header(),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
            CellSpec::content(),
        ])
}

#[test]
fn header_band_resolves_every_coordinate() {
    let grid = Grid::from_source(&banded()).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (3, 5));
    assert_eq!(grid.cell_count(), 11);

    // Second-row headers slide past the rowspans above them.
    let anchors: Vec<Coord> = grid.iter().map(|(_, d)| d.anchor).collect();
    assert_eq!(&anchors[4..6], [c(1, 2), c(1, 3)]);

    // Every spanned coordinate maps to the same cell.
    assert_eq!(grid.cell_at(c(0, 0)), grid.cell_at(c(1, 0)));
    assert_eq!(grid.cell_at(c(0, 2)), grid.cell_at(c(0, 3)));
    assert_ne!(grid.cell_at(c(0, 2)), grid.cell_at(c(1, 2)));
    assert_eq!(grid.cell_at(c(3, 0)), None);

    assert_eq!(grid.header_cells().count(), 7);
    assert_eq!(grid.content_cells().count(), 4);
}

#[test]
fn area_queries_dedupe_spanning_cells() {
    let grid = Grid::from_source(&banded()).unwrap();
    let band = Area::new(c(0, 0), c(1, 4));
    assert_eq!(grid.cells_in(&band).len(), 6);
    assert_eq!(grid.coords_in(&band).count(), 10);

    // Coordinates off the grid are skipped, not errors.
    let overhang = Area::new(c(2, 3), c(9, 9));
    assert_eq!(grid.cells_in(&overhang).len(), 2);
}

#[test]
fn ragged_table_leaves_a_hole() {
    let layout = TableLayout::new()
        .row(vec![CellSpec::header(), CellSpec::header()])
        .row(vec![CellSpec::content()]);
    match Grid::from_source(&layout) {
        Err(GridError::Uncovered { coord }) => assert_eq!(coord, c(1, 1)),
        other => panic!("expected Uncovered, got {other:?}"),
    }
}

#[test]
fn explicit_cells_may_overlap() {
    let cells = vec![
        CellSpec::header().colspan(2).at(0, 0),
        CellSpec::header().at(0, 1),
    ];
    match Grid::new(cells) {
        Err(GridError::Overlap {
            coord,
            first,
            second,
        }) => {
            assert_eq!(coord, c(0, 1));
            assert_eq!(first, c(0, 0));
            assert_eq!(second, c(0, 1));
        }
        other => panic!("expected Overlap, got {other:?}"),
    }
}

#[test]
fn layout_preserves_attributes() {
    let defs = banded().cell_defs().unwrap();
    assert_eq!(defs.len(), 11);
    let limited = TableLayout::new()
        .row(vec![CellSpec::header().rules("wip").limit("2,5").limit_area("+1,,+3,")])
        .cell_defs()
        .unwrap();
    assert_eq!(limited[0].attrs.matcher.as_deref(), Some("wip"));
    assert_eq!(limited[0].attrs.limit_area.as_deref(), Some("+1,,+3,"));
}

proptest! {
    #[test]
    fn uniform_tables_cover_every_coordinate(rows in 1u32..8, cols in 1u32..8) {
        let mut layout = TableLayout::new();
        for _ in 0..rows {
            layout = layout.row((0..cols).map(|_| CellSpec::content()).collect());
        }
        let grid = Grid::from_source(&layout).unwrap();
        prop_assert_eq!(grid.cell_count(), (rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let id = grid.cell_at(c(row, col)).unwrap();
                prop_assert_eq!(grid.cell(id).anchor, c(row, col));
            }
        }
    }

    #[test]
    fn absolute_area_text_reads_back(
        anchor in (0u32..50, 0u32..50),
        from in (0u32..50, 0u32..50),
        to in (0u32..50, 0u32..50),
    ) {
        let area = Area::new(c(from.0, from.1), c(to.0, to.1));
        let parsed = Area::parse(c(anchor.0, anchor.1), &area.to_string());
        prop_assert_eq!(parsed, Some(area));
    }
}
