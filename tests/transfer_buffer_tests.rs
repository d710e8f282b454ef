//! Integration tests for static and dynamic transfer buffers

use mosaic::{
    BlockAllocator, BlockPool, DynamicTransferBuffer, PoolManager, StaticTransferBuffer,
    TransferBuffer, config::BLOCK_SIZE,
};

const TEST_DATA: &str = "It was like this: I asked myself one day this question - what if Napoleon, for instance, \
had happened to be in my place, and if he had not had Toulon nor Egypt nor the passage of Mont Blanc to begin \
his career with, but instead of all those picturesque and monumental things, there had simply been some \
ridiculous old hag, a pawnbroker, who had to be murdered too to get money from her trunk (for his career, you \
understand). Well, would he have brought himself to that if there had been no other means?";

const TEST_BUFFER_SIZE: usize = 200;

fn test_data() -> &'static [u8] {
    TEST_DATA.as_bytes()
}

/// Read from `offset` (everything, or exactly `len` bytes) and compare with `data`
fn match_against(data: &[u8], buf: &dyn TransferBuffer, offset: usize, len: Option<usize>) -> bool {
    let mut local = [0u8; 1024];
    let len = match len {
        None => buf.read(offset, &mut local),
        Some(len) => {
            let res = buf.read(offset, &mut local[..len]);
            if res != len {
                eprintln!("match_against(): read {} expected {}", res, len);
                return false;
            }
            len
        }
    };
    local[..len] == data[offset..offset + len]
}

fn match_test_data(buf: &dyn TransferBuffer, offset: usize, len: Option<usize>) -> bool {
    match_against(test_data(), buf, offset, len)
}

fn all_equal(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == bytes[0])
}

#[cfg(test)]
mod transfer_buffer_tests {
    use super::*;

    #[test]
    fn test_data_validation() {
        assert!(TEST_DATA.len() / BLOCK_SIZE >= 4);
        assert!(TEST_DATA.len() > TEST_BUFFER_SIZE);
        assert!(!all_equal(&test_data()[..50]));
    }

    #[test]
    fn test_static_buffer_basic() {
        let mut buf = StaticTransferBuffer::<TEST_BUFFER_SIZE>::new();
        let mut local = [0xA5u8; TEST_BUFFER_SIZE * 2];

        // Empty reads
        assert_eq!(buf.read(0, &mut local), 0);
        assert_eq!(buf.read(0, &mut local[..0]), 0);
        assert_eq!(buf.read(999, &mut local[..0]), 0);
        assert!(all_equal(&local));

        // Bulk write
        assert_eq!(buf.write(0, test_data()), TEST_BUFFER_SIZE);
        assert!(match_test_data(&buf, 0, None));
        assert!(match_test_data(&buf, TEST_BUFFER_SIZE, None));
        assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 2, None));
        assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 2, Some(TEST_BUFFER_SIZE / 4)));
        assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 4, Some(TEST_BUFFER_SIZE / 2)));
        assert!(match_test_data(&buf, 0, Some(TEST_BUFFER_SIZE / 4)));

        // Reset
        buf.reset();
        assert_eq!(buf.read(0, &mut local[..0]), 0);
        assert_eq!(buf.read(0, &mut local), 0);
        assert!(all_equal(&local));

        // Random write
        assert_eq!(buf.write(12, &test_data()[12..33]), 21);
        assert!(match_test_data(&buf, 12, Some(21)));

        assert_eq!(buf.write(0, &test_data()[..12]), 12);
        assert!(match_test_data(&buf, 0, None));

        assert_eq!(buf.write(21, &test_data()[21..21]), 0);
        assert_eq!(buf.write(21, &test_data()[21..]), TEST_BUFFER_SIZE - 21);
        assert!(match_test_data(&buf, 21, Some(TEST_BUFFER_SIZE - 21)));
        assert!(match_test_data(&buf, 0, None));
    }

    #[test]
    fn test_static_buffer_truncates_to_capacity() {
        let mut buf = StaticTransferBuffer::<TEST_BUFFER_SIZE>::new();
        assert_eq!(buf.write(0, test_data()), TEST_BUFFER_SIZE);
        assert_eq!(buf.as_slice(), &test_data()[..TEST_BUFFER_SIZE]);
        assert_eq!(buf.write(TEST_BUFFER_SIZE, test_data()), 0);
    }

    #[test]
    fn test_dynamic_buffer_basic() {
        const POOL_BLOCKS: usize = 8;
        let pool = BlockPool::<POOL_BLOCKS>::new();
        let mut poolmgr = PoolManager::<2>::new();
        poolmgr.add_pool(&pool).unwrap();

        {
            let mut buf = DynamicTransferBuffer::new(&poolmgr, TEST_BUFFER_SIZE);
            let mut local = [0xA5u8; TEST_BUFFER_SIZE * 2];

            // Empty reads
            assert_eq!(buf.read(0, &mut local), 0);
            assert_eq!(buf.read(0, &mut local[..0]), 0);
            assert_eq!(buf.read(999, &mut local[..0]), 0);
            assert!(all_equal(&local));

            // Bulk write
            assert_eq!(buf.write(0, test_data()), TEST_BUFFER_SIZE);
            assert!(pool.used_blocks() > 0);

            assert!(match_test_data(&buf, 0, None));
            assert!(match_test_data(&buf, TEST_BUFFER_SIZE, None));
            assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 2, None));
            assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 2, Some(TEST_BUFFER_SIZE / 4)));
            assert!(match_test_data(&buf, TEST_BUFFER_SIZE / 4, Some(TEST_BUFFER_SIZE / 2)));
            assert!(match_test_data(&buf, 0, Some(TEST_BUFFER_SIZE / 4)));

            // Reset
            buf.reset();
            assert_eq!(buf.read(0, &mut local[..0]), 0);
            assert_eq!(buf.read(0, &mut local), 0);
            assert!(all_equal(&local));
            assert_eq!(pool.used_blocks(), 0);

            // Random write
            assert_eq!(buf.write(12, &test_data()[12..33]), 21);
            assert!(match_test_data(&buf, 12, Some(21)));

            let tail = TEST_BUFFER_SIZE - 60;
            assert_eq!(buf.write(tail, &test_data()[tail..TEST_BUFFER_SIZE]), 60);
            assert!(match_test_data(&buf, tail, None));

            // Two holes now: empty-data-empty-data
            assert_eq!(buf.write(0, &test_data()[..0]), 0);
            assert_eq!(
                buf.write(21, &test_data()[21..TEST_BUFFER_SIZE]),
                TEST_BUFFER_SIZE - 21
            );
            assert!(match_test_data(&buf, 21, Some(TEST_BUFFER_SIZE - 21)));

            // Now: empty-data-data-data
            assert_eq!(buf.write(0, &test_data()[..21]), 21);
            assert!(match_test_data(&buf, 0, None));

            assert!(pool.used_blocks() > 0);
        }

        // Leaving scope returns every block
        assert_eq!(pool.used_blocks(), 0);
    }

    #[test]
    fn test_dynamic_buffer_block_straddling_reads() {
        let pool = BlockPool::<8>::new();
        let mut buf = DynamicTransferBuffer::new(&pool, TEST_BUFFER_SIZE);
        buf.write(0, test_data());

        for offset in [BLOCK_SIZE - 1, BLOCK_SIZE, 2 * BLOCK_SIZE - 3] {
            assert!(match_test_data(&buf, offset, Some(BLOCK_SIZE + 5)));
        }
    }

    #[test]
    fn test_dynamic_buffer_out_of_memory_mid_write() {
        let pool = BlockPool::<3>::new();
        let mut buf = DynamicTransferBuffer::new(&pool, TEST_BUFFER_SIZE);

        // Only three blocks exist: the write stops at the third block boundary
        assert_eq!(buf.write(10, &test_data()[10..]), 3 * BLOCK_SIZE - 10);
        assert_eq!(pool.used_blocks(), 3);
        assert_eq!(buf.num_blocks(), 3);
        assert_eq!(buf.max_write_pos(), 3 * BLOCK_SIZE);
        assert!(match_test_data(&buf, 10, None));

        // Nothing more can be stored past the chain
        assert_eq!(buf.write(3 * BLOCK_SIZE, test_data()), 0);
        assert_eq!(pool.stats().allocation_failures, 2);

        // Earlier bytes are still writable
        assert_eq!(buf.write(0, &test_data()[..10]), 10);
        assert!(match_test_data(&buf, 0, None));
    }

    #[test]
    fn test_dynamic_buffer_far_write_with_exhausted_pool() {
        let pool = BlockPool::<2>::new();
        let mut buf = DynamicTransferBuffer::new(&pool, TEST_BUFFER_SIZE);

        // The chain grows as far as it can but never reaches the target range
        assert_eq!(buf.write(150, &test_data()[150..160]), 0);
        assert_eq!(buf.num_blocks(), 2);
        assert_eq!(buf.max_write_pos(), 0);

        let mut local = [0u8; 16];
        assert_eq!(buf.read(0, &mut local), 0);
    }

    #[test]
    fn test_dynamic_buffer_reads_stop_at_write_frontier() {
        let pool = BlockPool::<8>::new();
        let mut buf = DynamicTransferBuffer::new(&pool, TEST_BUFFER_SIZE);
        buf.write(40, &test_data()[40..50]);

        let mut local = [0xA5u8; 64];
        assert_eq!(buf.read(50, &mut local), 0);
        assert_eq!(buf.read(45, &mut local), 5);
        // The leading hole reads back as zeroes
        assert_eq!(buf.read(0, &mut local), 50);
        assert!(local[..40].iter().all(|&b| b == 0));
    }
}
