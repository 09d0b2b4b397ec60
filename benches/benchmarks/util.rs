use std::fmt::Write;

const CITY_ROW: &str = "El Tarter\tEl Tarter\tEhl Tarter,Эл Тартер\t42.57952\t1.65362\tP\tPPL\tAD\t\t02\t\t\t\t1052\t\t1721\tEurope/Andorra\t2012-11-03";

/// A city dump with `rows` rows, every tenth of them one field short.
pub fn city_dump(rows: u64) -> Vec<u8> {
    let mut dump = String::new();
    for id in 0..rows {
        let row = if id % 10 == 9 { CITY_ROW.rsplit_once('\t').map_or(CITY_ROW, |(head, _)| head) } else { CITY_ROW };
        writeln!(dump, "{}\t{}", 3_039_154 + id, row).expect("Benchmark setup: unable to build dump");
    }
    dump.into_bytes()
}
