use std::io::Write;
use std::sync::Arc;

use arrow::array::{BooleanArray, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use flate2::write::GzEncoder;
use flate2::Compression;
use parquet::arrow::ArrowWriter;

fn main() {
    let titles = [
        "Concierto de la Orquesta Típica",
        "Danza contemporánea: Cuerpos",
        "Ciclo de cine mexicano",
        "Taller de grabado",
        "Lectura en voz alta",
        "Teatro de títeres",
    ];
    let kinds = ["música", "danza", "cine", "taller", "literatura", "teatro"];
    let venues = [
        "Teatro de la Ciudad Esperanza Iris",
        "Museo de la Ciudad de México",
        "Faro de Oriente",
        "Foro A Poco No",
    ];
    let categories = ["Infantil", "Adultos", "Todo público"];

    // 2025-10-02 as days since the epoch.
    let first_day: i32 = 20363;

    let mut evento = Vec::new();
    let mut tipo = Vec::new();
    let mut recinto = Vec::new();
    let mut fecha = Vec::new();
    let mut categoria = Vec::new();
    let mut precio = Vec::new();
    let mut gratuito = Vec::new();
    let mut id = Vec::new();

    for i in 0..24usize {
        let k = i % titles.len();
        evento.push(titles[k].to_string());
        tipo.push(kinds[k].to_string());
        recinto.push(venues[(i * 3) % venues.len()].to_string());
        fecha.push(first_day + ((i * 7) % 30) as i32);
        categoria.push(categories[(i / 2) % categories.len()].to_string());
        let free = i % 5 == 0;
        gratuito.push(free);
        precio.push(if free {
            None
        } else {
            Some(50.0 * (1 + (i * 3) % 8) as f64)
        });
        id.push(i as i64 + 1);
    }

    // Names are deliberately messy; the viewer normalizes them.
    let schema = Arc::new(Schema::new(vec![
        Field::new("ID", DataType::Int64, false),
        Field::new("Evento ", DataType::Utf8, false),
        Field::new("evento", DataType::Utf8, false),
        Field::new("Recinto!", DataType::Utf8, false),
        Field::new("Fecha Inicio", DataType::Date32, false),
        Field::new("Categoría", DataType::Utf8, false),
        Field::new("Precio (MXN)", DataType::Float64, true),
        Field::new("Gratuito", DataType::Boolean, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(id)),
            Arc::new(StringArray::from(evento)),
            Arc::new(StringArray::from(tipo)),
            Arc::new(StringArray::from(recinto)),
            Arc::new(Date32Array::from(fecha)),
            Arc::new(StringArray::from(categoria)),
            Arc::new(Float64Array::from(precio)),
            Arc::new(BooleanArray::from(gratuito)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let mut parquet_bytes = Vec::new();
    let mut writer =
        ArrowWriter::try_new(&mut parquet_bytes, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    let output_path = "sample_events.parquet.gz";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut gz = GzEncoder::new(file, Compression::default());
    gz.write_all(&parquet_bytes).expect("Failed to compress");
    gz.finish().expect("Failed to finish gzip stream");

    println!(
        "Wrote {} events ({} parquet bytes before gzip) to {output_path}",
        batch.num_rows(),
        parquet_bytes.len()
    );
}
