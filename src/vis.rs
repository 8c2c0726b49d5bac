// Draws a walked route over the reference map layout as a standalone SVG:
// a dot per location, a segment per leg. Some legs are not straight on the
// map: approaches to the chair shelf and the lever shelf always bend through
// a fixed waypoint, and moving between the lever and the sockets crosses the
// room corridor.

use svg::node::element::path::Data;
use svg::node::element::{Circle, Text};
use svg::Document;

use crate::level::{Category, Target};
use crate::simulate::Walk;

const WIDTH: f32 = 900.0;
const HEIGHT: f32 = 950.0;

/// Marker position on the reference map, in map pixels.
fn coord(target: Target) -> (f32, f32) {
    match target {
        Target::Entrance => (330.0, 863.0),
        Target::ChairShelf => (42.0, 356.0),
        Target::MiddleTable => (526.0, 443.0),
        Target::Lever => (742.0, 729.0),
        Target::BelowLever => (773.0, 187.0),
        Target::LeverShelf => (825.0, 43.0),
        Target::SocketA => (283.0, 163.0),
        Target::SocketB => (356.0, 163.0),
        Target::SocketC => (537.0, 163.0),
        Target::SocketD => (627.0, 163.0),
    }
}

/// Waypoint a leg bends through, if it is not a straight line on the map.
fn waypoint(from: Target, to: Target) -> Option<(f32, f32)> {
    use Target::*;
    match (from, to) {
        // Reaching these always means a detour, whatever the origin.
        (_, ChairShelf) => Some((118.0, 674.0)),
        (_, LeverShelf) => Some((813.0, 208.0)),
        (Entrance, MiddleTable) => Some((224.0, 349.0)),
        (SocketA | SocketB | SocketC | SocketD, Lever) => Some((714.0, 349.0)),
        (Lever, SocketA | SocketB | SocketC | SocketD) => Some((721.0, 340.0)),
        _ => None,
    }
}

pub fn render(walk: &Walk) -> Document {
    let mut document = Document::new()
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT));

    for leg in walk.route.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        let mut data = Data::new().move_to(coord(from));
        if let Some(via) = waypoint(from, to) {
            data = data.line_to(via);
        }
        let data = data.line_to(coord(to));
        let segment = svg::node::element::Path::new()
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 2)
            .set("d", data);
        document = document.add(segment);
    }

    for &target in Target::ALL.iter() {
        let (x, y) = coord(target);
        let color = match target.category() {
            Category::Start => "#ff8080",
            Category::Battery => "#80ff80",
            Category::Socket => "#8080ff",
            Category::Lever => "#ffff80",
        };
        let circle = Circle::new()
            .set("cx", x)
            .set("cy", y)
            .set("r", 10)
            .set("fill", color)
            .set("stroke", "black")
            .set("stroke-width", 2)
            .set("title", target.name());
        document = document.add(circle);

        let label = Text::new(target.symbol().to_string())
            .set("x", x)
            .set("y", y - 14.0)
            .set("text-anchor", "middle")
            .set("font-size", "20px");
        document = document.add(label);
    }

    let caption = Text::new(format!("Route length: {}", walk.cost))
        .set("x", WIDTH / 2.0)
        .set("y", HEIGHT - 20.0)
        .set("text-anchor", "middle")
        .set("font-size", "24px");
    document.add(caption)
}
