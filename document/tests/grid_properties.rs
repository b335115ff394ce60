use proptest::prelude::*;
use skirmish_map_core::{
    ResourceCell, TemplateInfo, TerrainCell, TileSet, TileSetCatalog, MAP_GRID_ENTRY,
    MAP_TEXT_ENTRY,
};
use skirmish_map_document::{LoadEnvironment, MapDocument};

const TEMPLATES: u16 = 32;

fn catalog() -> TileSetCatalog {
    let mut tileset = TileSet::new("DESERT");
    for template in 0..TEMPLATES {
        let _ = tileset.insert_template(template, TemplateInfo::default());
    }
    let mut catalog = TileSetCatalog::new();
    let _ = catalog.insert(tileset);
    catalog
}

fn populated(width: u32, height: u32, cells: &[(u16, u8, u8, u8)]) -> MapDocument {
    let mut map = MapDocument::from_tileset("DESERT", &catalog()).expect("tileset exists");
    map.resize(width, height).expect("map resizes");
    let positions = (0..height).flat_map(|y| (0..width).map(move |x| (x, y)));
    for ((x, y), &(template, index, kind, density)) in positions.zip(cells) {
        let _ = map.set_terrain(x, y, TerrainCell::new(template, index));
        let _ = map.set_resource(x, y, ResourceCell::new(kind, density));
    }
    map
}

fn sized_cells() -> impl Strategy<Value = (u32, u32, Vec<(u16, u8, u8, u8)>)> {
    (1u32..10, 1u32..10).prop_flat_map(|(width, height)| {
        let cells = proptest::collection::vec(
            (0..TEMPLATES, 0u8..0xff, any::<u8>(), any::<u8>()),
            (width * height) as usize,
        );
        (Just(width), Just(height), cells)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// A resized and repainted map reloads with identical grids.
    #[test]
    fn resized_maps_round_trip_through_save((width, height, cells) in sized_cells()) {
        let mut map = populated(width, height, &cells);

        let entries = map.to_entries(&catalog()).unwrap();
        let loaded = MapDocument::load(
            &entries[MAP_TEXT_ENTRY],
            &entries[MAP_GRID_ENTRY],
            &LoadEnvironment::default(),
        )
        .unwrap();

        prop_assert_eq!(loaded.terrain(), map.terrain());
        prop_assert_eq!(loaded.resources(), map.resources());
        prop_assert_eq!(loaded.map_size(), map.map_size());
    }

    /// Growing then shrinking back restores every original cell.
    #[test]
    fn grow_then_shrink_is_lossless(
        (width, height, cells) in sized_cells(),
        grow_x in 0u32..5,
        grow_y in 0u32..5,
    ) {
        let mut map = populated(width, height, &cells);
        let original = map.clone();

        map.resize(width + grow_x, height + grow_y).unwrap();
        let fill = *original.terrain().get(0, 0).unwrap();
        if grow_x > 0 {
            prop_assert_eq!(map.terrain().get(width, 0), Some(&fill));
        }

        map.resize(width, height).unwrap();
        prop_assert_eq!(map, original);
    }
}
