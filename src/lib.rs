/*!
The `keyspan` crate builds and consumes a byte-span index over a delimited
flat text file, so that all rows sharing a value in one designated column can
be fetched with a single seek and a bounded read instead of a full scan.

It is aimed at large append-style or sorted datasets where grouping by a
categorical key is common (say, looking up every row for a given identifier
code) but a full database would be overkill. The one structural requirement
is that the source file is already physically grouped by the key: identical
key values must occur in unbroken consecutive runs. If a key value reappears
in a later, non-adjacent run, the span recorded for it is silently replaced
by the later run and the earlier rows become unreachable through the index.

# Example: build an index, then fetch by key

```no_run
use std::error::Error;

use keyspan::{IndexBuilder, IndexReader};

fn example() -> Result<(), Box<dyn Error>> {
    // Index column 1 of a tab-delimited file, skipping one header line.
    // The index is written next to the source as `data.tsv.idx`.
    let built = IndexBuilder::new().skip_lines(1).index("data.tsv", 1)?;
    println!("index written to {}", built.index_path().display());

    // Later (possibly in another process), fetch all rows for one key.
    let rdr = IndexReader::from_path("data.tsv")?;
    for row in rdr.fetch("A010")? {
        println!("{:?}", row);
    }
    Ok(())
}
```

# Example: a secondary, coarser index on the same source

A key transform derives the grouping key from the raw column value. Building
with a transform and a distinct index path yields an independent secondary
index over the same data, e.g. grouping by the first character of the key:

```no_run
use keyspan::IndexBuilder;

# fn example() -> keyspan::Result<()> {
IndexBuilder::new()
    .key_transform(|key| key.chars().take(1).collect())
    .index_path("data.tsv.first.idx")
    .index("data.tsv", 1)?;
# Ok(())
# }
```

Note that an index cannot be updated in place. If the source file changes,
the index must be rebuilt or every recorded span is suspect.
*/

#![deny(missing_docs)]

pub use crate::builder::{BuiltIndex, IndexBuilder};
pub use crate::error::{Error, Result};
pub use crate::index::{default_index_path, FileIndex, Span};
pub use crate::reader::IndexReader;
pub use crate::row::{Row, RowIter};

mod builder;
mod error;
mod index;
mod reader;
mod row;
