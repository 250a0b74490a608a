//! Airline route dataset for arc overlays.
//!
//! Parses the OpenFlights airport and route tables (comma-separated, quoted
//! fields) and joins them into renderable arcs. Malformed rows are dropped
//! silently; the dataset load continues with whatever parses.

use std::collections::HashMap;

pub const AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";
pub const ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";

#[derive(Clone, Debug)]
pub struct Airport {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: String,
    pub icao: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub airline: String,
    pub src_iata: String,
    pub src_airport_id: String,
    pub dst_iata: String,
    pub dst_airport_id: String,
    pub stops: u32,
}

/// One renderable great-circle arc between two airports.
#[derive(Clone, Debug)]
pub struct RouteArc {
    pub airline: String,
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

/// Splits one comma-separated row, honoring double-quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

pub fn parse_airports(data: &str) -> Vec<Airport> {
    let mut airports = Vec::new();
    for line in data.lines() {
        let fields = split_row(line);
        if fields.len() < 8 {
            continue;
        }
        let (Ok(lat), Ok(lon)) = (fields[6].parse::<f64>(), fields[7].parse::<f64>()) else {
            continue;
        };
        if !lat.is_finite() || !lon.is_finite() {
            continue;
        }
        airports.push(Airport {
            id: fields[0].clone(),
            name: fields[1].clone(),
            city: fields[2].clone(),
            country: fields[3].clone(),
            iata: fields[4].clone(),
            icao: fields[5].clone(),
            lat,
            lon,
        });
    }
    log::info!("parsed {} airports", airports.len());
    airports
}

pub fn parse_routes(data: &str) -> Vec<Route> {
    let mut routes = Vec::new();
    for line in data.lines() {
        let fields = split_row(line);
        if fields.len() < 8 {
            continue;
        }
        let Ok(stops) = fields[7].parse::<u32>() else {
            continue;
        };
        routes.push(Route {
            airline: fields[0].clone(),
            src_iata: fields[2].clone(),
            src_airport_id: fields[3].clone(),
            dst_iata: fields[4].clone(),
            dst_airport_id: fields[5].clone(),
            stops,
        });
    }
    log::info!("parsed {} routes", routes.len());
    routes
}

/// Joins non-stop routes to their endpoint airports and keeps those touching
/// `country`. Routes whose endpoints cannot be resolved are dropped.
pub fn build_arcs(airports: &[Airport], routes: &[Route], country: &str) -> Vec<RouteArc> {
    let mut by_id: HashMap<&str, &Airport> = HashMap::new();
    let mut by_iata: HashMap<&str, &Airport> = HashMap::new();
    for airport in airports {
        by_id.insert(airport.id.as_str(), airport);
        if !airport.iata.is_empty() && airport.iata != "\\N" {
            by_iata.insert(airport.iata.as_str(), airport);
        }
    }

    let resolve = |iata: &str, id: &str| -> Option<&Airport> {
        by_iata.get(iata).or_else(|| by_id.get(id)).copied()
    };

    routes
        .iter()
        .filter(|r| r.stops == 0)
        .filter_map(|r| {
            let src = resolve(&r.src_iata, &r.src_airport_id)?;
            let dst = resolve(&r.dst_iata, &r.dst_airport_id)?;
            (src.country == country || dst.country == country).then(|| RouteArc {
                airline: r.airline.clone(),
                start_lat: src.lat,
                start_lon: src.lon,
                end_lat: dst.lat,
                end_lon: dst.lon,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = "\
3797,\"John F Kennedy International Airport\",\"New York\",\"United States\",\"JFK\",\"KJFK\",40.63980103,-73.77890015,13,-5,\"A\",\"America/New_York\",\"airport\",\"OurAirports\"
507,\"London Heathrow Airport\",\"London\",\"United Kingdom\",\"LHR\",\"EGLL\",51.4706,-0.461941,83,0,\"E\",\"Europe/London\",\"airport\",\"OurAirports\"
1,\"Broken, Airport\",\"Nowhere\",\"Atlantis\",\"\\N\",\"\\N\",not-a-lat,0.0,0,0,\"U\",\"UTC\",\"airport\",\"OurAirports\"";

    const ROUTES: &str = "\
BA,1355,JFK,3797,LHR,507,,0,744
BA,1355,LHR,507,JFK,3797,,1,744
XX,0,AAA,9999,BBB,9998,,0,320";

    #[test]
    fn quoted_commas_stay_inside_one_field() {
        let fields = split_row("1,\"Broken, Airport\",\"Nowhere\"");
        assert_eq!(fields, vec!["1", "Broken, Airport", "Nowhere"]);
    }

    #[test]
    fn malformed_airport_rows_are_dropped() {
        let airports = parse_airports(AIRPORTS);
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[0].iata, "JFK");
        assert_eq!(airports[0].country, "United States");
    }

    #[test]
    fn arcs_keep_only_resolvable_nonstop_routes_touching_the_country() {
        let airports = parse_airports(AIRPORTS);
        let routes = parse_routes(ROUTES);
        assert_eq!(routes.len(), 3);
        // One-stop JFK-LHR and the unresolvable AAA-BBB are filtered out.
        let arcs = build_arcs(&airports, &routes, "United States");
        assert_eq!(arcs.len(), 1);
        let arc = &arcs[0];
        assert_eq!(arc.airline, "BA");
        assert!((arc.start_lat - 40.63980103).abs() < 1e-9);
        assert!((arc.end_lon - -0.461941).abs() < 1e-9);
    }

    #[test]
    fn country_filter_excludes_foreign_arcs() {
        let airports = parse_airports(AIRPORTS);
        let routes = parse_routes(ROUTES);
        let arcs = build_arcs(&airports, &routes, "France");
        assert!(arcs.is_empty());
    }
}
